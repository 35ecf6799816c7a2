//! # Pool Errors

use mz_01_chain_cache::CacheError;
use shared_types::{ConfigError, FetchTask};
use thiserror::Error;

/// How a prefetch that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchOutcome {
    /// Every task succeeded; the range is cache-hot.
    Completed,
    /// The cancel token was raised first. Not an error.
    Cancelled,
}

impl PrefetchOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PrefetchOutcome::Cancelled)
    }
}

#[derive(Debug, Clone, Error)]
pub enum PoolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// First task to fail.
    #[error("prefetch of {task} failed: {source}")]
    Fetch {
        task: FetchTask,
        #[source]
        source: CacheError,
    },

    /// A worker panicked.
    #[error("prefetch worker aborted: {0}")]
    WorkerAborted(String),
}
