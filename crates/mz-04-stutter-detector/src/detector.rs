//! # Detector
//!
//! Streaming state machine: feed blocks in increasing index order, collect
//! the reports each one produces.

use std::fmt;
use std::time::Duration;

use shared_types::{format_timestamp, BlockIndex, BlockRecord, TimestampMs};

use crate::errors::StutterError;

/// Index and timestamp of one side of a stutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStamp {
    pub index: BlockIndex,
    pub timestamp_ms: TimestampMs,
}

impl From<&BlockRecord> for BlockStamp {
    fn from(block: &BlockRecord) -> Self {
        Self {
            index: block.index,
            timestamp_ms: block.timestamp_ms,
        }
    }
}

impl fmt::Display for BlockStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block:{} at:{}", self.index, format_timestamp(self.timestamp_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StutterReport {
    /// Blocks strictly between the previous stutter and this one's `prev`.
    Skipped { count: u32 },
    Stutter {
        prev: BlockStamp,
        curr: BlockStamp,
        delta: Duration,
    },
}

impl fmt::Display for StutterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StutterReport::Skipped { count } => write!(f, "-- skipped {} blocks --", count),
            StutterReport::Stutter { prev, curr, delta } => write!(
                f,
                "{}\n{} [<- stutter for {}]",
                prev,
                curr,
                humantime::format_duration(*delta)
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StutterDetector {
    threshold: Duration,
    prev: Option<BlockStamp>,
    last_stutter: Option<BlockIndex>,
}

impl StutterDetector {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            prev: None,
            last_stutter: None,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Advance by one block. Returns nothing, a stutter, or a skip count
    /// followed by a stutter.
    pub fn observe(&mut self, block: &BlockRecord) -> Vec<StutterReport> {
        let curr = BlockStamp::from(block);
        let Some(prev) = self.prev.replace(curr) else {
            return Vec::new();
        };

        // Timestamps are not guaranteed monotonic; a backwards step is no gap.
        let delta = Duration::from_millis(curr.timestamp_ms.saturating_sub(prev.timestamp_ms));
        if delta <= self.threshold {
            return Vec::new();
        }

        let mut reports = Vec::with_capacity(2);
        if let Some(last) = self.last_stutter {
            let gap = prev.index.saturating_sub(last);
            if gap > 1 {
                reports.push(StutterReport::Skipped { count: gap - 1 });
            }
        }
        reports.push(StutterReport::Stutter { prev, curr, delta });
        self.last_stutter = Some(curr.index);
        reports
    }
}

/// Run a detector over a whole sequence.
///
/// ## Errors
///
/// `InsufficientRange` when the sequence holds fewer than two blocks.
pub fn scan<'a, I>(blocks: I, threshold: Duration) -> Result<Vec<StutterReport>, StutterError>
where
    I: IntoIterator<Item = &'a BlockRecord>,
{
    let mut detector = StutterDetector::new(threshold);
    let mut seen = 0usize;
    let mut reports = Vec::new();
    for block in blocks {
        seen += 1;
        reports.extend(detector.observe(block));
    }
    if seen < 2 {
        return Err(StutterError::InsufficientRange { blocks: seen });
    }
    Ok(reports)
}
