//! # Range Search
//!
//! Sequential driver over a range the fetch pool already warmed. Runs on the
//! caller's task; only the cache is touched.

use std::fmt;

use mz_01_chain_cache::ChainReader;
use shared_types::{
    format_timestamp, BlockIndex, BlockRange, CancelToken, NotificationEvent, ScanStatus,
    TimestampMs,
};

use crate::criteria::CriteriaSet;
use crate::decode::DecodedNotification;
use crate::errors::SearchError;

/// One matched event with its block context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMatch {
    pub block_index: BlockIndex,
    pub timestamp_ms: TimestampMs,
    pub event: NotificationEvent,
    pub decoded: DecodedNotification,
}

impl fmt::Display for NotificationMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block:{} at:{} name:{}",
            self.block_index,
            format_timestamp(self.timestamp_ms),
            self.event.name
        )?;
        if let Some(details) = self.decoded.details() {
            write!(f, " {}", details)?;
        }
        Ok(())
    }
}

pub struct NotificationScanner<'a, C: ?Sized> {
    reader: &'a C,
    criteria: &'a CriteriaSet,
}

impl<'a, C: ChainReader + ?Sized> NotificationScanner<'a, C> {
    pub fn new(reader: &'a C, criteria: &'a CriteriaSet) -> Self {
        Self { reader, criteria }
    }

    /// Walk `range` in order, handing each match to `on_match` as soon as its
    /// block is read. Checks `cancel` before every block.
    pub async fn scan<F>(
        &self,
        range: BlockRange,
        cancel: &CancelToken,
        mut on_match: F,
    ) -> Result<ScanStatus, SearchError>
    where
        F: FnMut(NotificationMatch),
    {
        for index in range.iter() {
            if cancel.is_cancelled() {
                tracing::debug!("[mz-03] search cancelled before block {}", index);
                return Ok(ScanStatus::Cancelled);
            }

            let fetch_err = |source| SearchError::Fetch {
                block: index,
                source,
            };
            let block = self.reader.get_block(index).await.map_err(fetch_err)?;
            let events = self
                .reader
                .get_all_notifications(&block)
                .await
                .map_err(fetch_err)?;

            for event in events {
                if !self.criteria.matches(&event) {
                    continue;
                }
                let decoded = DecodedNotification::decode(&event);
                on_match(NotificationMatch {
                    block_index: block.index,
                    timestamp_ms: block.timestamp_ms,
                    event,
                    decoded,
                });
            }
        }
        Ok(ScanStatus::Completed)
    }

    /// Every match in `range`, block order then event order.
    pub async fn search(&self, range: BlockRange) -> Result<Vec<NotificationMatch>, SearchError> {
        let mut matches = Vec::new();
        self.scan(range, &CancelToken::new(), |m| matches.push(m))
            .await?;
        Ok(matches)
    }
}
