//! # Range Driver
//!
//! Reads a prefetched range block by block through the cache and feeds the
//! detector.

use std::time::Duration;

use mz_01_chain_cache::ChainReader;
use shared_types::{BlockRange, CancelToken, ScanStatus};

use crate::detector::{StutterDetector, StutterReport};
use crate::errors::StutterError;

pub struct StutterScanner<'a, C: ?Sized> {
    reader: &'a C,
    threshold: Duration,
}

impl<'a, C: ChainReader + ?Sized> StutterScanner<'a, C> {
    pub fn new(reader: &'a C, threshold: Duration) -> Self {
        Self { reader, threshold }
    }

    /// Scan `range`, handing each report to `on_report` as it is produced.
    pub async fn scan<F>(
        &self,
        range: BlockRange,
        cancel: &CancelToken,
        mut on_report: F,
    ) -> Result<ScanStatus, StutterError>
    where
        F: FnMut(StutterReport),
    {
        if range.len() < 2 {
            return Err(StutterError::InsufficientRange {
                blocks: range.len(),
            });
        }

        let mut detector = StutterDetector::new(self.threshold);
        for index in range.iter() {
            if cancel.is_cancelled() {
                tracing::debug!("[mz-04] stutter scan cancelled before block {}", index);
                return Ok(ScanStatus::Cancelled);
            }
            let block = self
                .reader
                .get_block(index)
                .await
                .map_err(|source| StutterError::Fetch {
                    block: index,
                    source,
                })?;
            for report in detector.observe(&block) {
                on_report(report);
            }
        }
        Ok(ScanStatus::Completed)
    }
}

/// All reports for `range`.
pub async fn scan_range<C: ChainReader + ?Sized>(
    reader: &C,
    range: BlockRange,
    threshold: Duration,
) -> Result<Vec<StutterReport>, StutterError> {
    let mut reports = Vec::new();
    StutterScanner::new(reader, threshold)
        .scan(range, &CancelToken::new(), |r| reports.push(r))
        .await?;
    Ok(reports)
}
