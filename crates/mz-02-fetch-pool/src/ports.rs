//! # Ports
//!
//! - `FetchExecutor`: what a worker does with a claimed task. Implemented
//!   for every `ChainReader`, so the cache plugs in directly.
//! - `ProgressObserver`: completion callbacks for progress reporting.

use async_trait::async_trait;
use mz_01_chain_cache::{CacheError, ChainReader};
use shared_types::FetchTask;

#[async_trait]
pub trait FetchExecutor: Send + Sync {
    /// Warm the cache for `task`. The fetched values are discarded.
    async fn execute(&self, task: FetchTask) -> Result<(), CacheError>;
}

#[async_trait]
impl<C: ChainReader + ?Sized> FetchExecutor for C {
    async fn execute(&self, task: FetchTask) -> Result<(), CacheError> {
        match task {
            FetchTask::Block(index) => {
                self.get_block(index).await?;
            }
            FetchTask::BlockWithLogs(index) => {
                let block = self.get_block(index).await?;
                self.get_all_notifications(&block).await?;
            }
            FetchTask::Log(hash) => {
                self.get_application_log(&hash).await?;
            }
        }
        Ok(())
    }
}

/// Receives progress from the workers. Called concurrently.
pub trait ProgressObserver: Send + Sync {
    fn on_start(&self, _total: usize) {}

    /// `done` tasks out of `total` have finished successfully.
    fn on_task_complete(&self, done: usize, total: usize);
}

/// Observer that ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_task_complete(&self, _done: usize, _total: usize) {}
}
