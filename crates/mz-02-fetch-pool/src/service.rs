//! # Fetch Pool Service
//!
//! `workers` long-lived tokio tasks claim `FetchTask`s from a shared queue of
//! capacity 1. The dispatcher waits on whichever happens first: room in the
//! queue, a worker error, or cancellation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use shared_types::{CancelToken, FetchTask};
use tokio::sync::{mpsc, Mutex};

use crate::config::PoolConfig;
use crate::errors::{PoolError, PrefetchOutcome};
use crate::ports::{FetchExecutor, NoProgress, ProgressObserver};

/// Bounded worker pool over a `FetchExecutor`.
pub struct FetchPool<E: ?Sized> {
    executor: Arc<E>,
    config: PoolConfig,
    observer: Arc<dyn ProgressObserver>,
}

impl<E: FetchExecutor + ?Sized + 'static> FetchPool<E> {
    /// ## Errors
    ///
    /// `Config` when `config.workers` is zero.
    pub fn new(executor: Arc<E>, config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self {
            executor,
            config,
            observer: Arc::new(NoProgress),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Run every task, returning once all succeeded, one failed, or
    /// `cancel` was raised.
    pub async fn prefetch(
        &self,
        tasks: Vec<FetchTask>,
        cancel: &CancelToken,
    ) -> Result<PrefetchOutcome, PoolError> {
        if cancel.is_cancelled() {
            return Ok(PrefetchOutcome::Cancelled);
        }
        let total = tasks.len();
        if total == 0 {
            return Ok(PrefetchOutcome::Completed);
        }

        let workers = self.config.workers.min(total);
        tracing::debug!("[mz-02] prefetching {} tasks with {} workers", total, workers);
        self.observer.on_start(total);

        let (task_tx, task_rx) = mpsc::channel::<FetchTask>(1);
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (err_tx, mut err_rx) = mpsc::channel::<PoolError>(workers);
        let completed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    executor: self.executor.clone(),
                    queue: task_rx.clone(),
                    errors: err_tx.clone(),
                    cancel: cancel.clone(),
                    observer: self.observer.clone(),
                    completed: completed.clone(),
                    total,
                };
                tokio::spawn(worker.run())
            })
            .collect();
        drop(err_tx);
        // Only workers may own the queue, so `send` fails once all have exited.
        drop(task_rx);

        for task in tasks {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("[mz-02] cancelled during dispatch");
                    return Ok(PrefetchOutcome::Cancelled);
                }
                Some(err) = err_rx.recv() => return Err(err),
                sent = task_tx.send(task) => {
                    if sent.is_err() {
                        // Every worker has exited; the cause is collected below.
                        break;
                    }
                }
            }
        }
        drop(task_tx);

        let joined = join_all(handles);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(PrefetchOutcome::Cancelled),
            Some(err) = err_rx.recv() => Err(err),
            results = joined => {
                if let Ok(err) = err_rx.try_recv() {
                    return Err(err);
                }
                for result in results {
                    if let Err(join_err) = result {
                        return Err(PoolError::WorkerAborted(join_err.to_string()));
                    }
                }
                let done = completed.load(Ordering::SeqCst);
                tracing::debug!("[mz-02] prefetch complete ({} tasks)", done);
                Ok(PrefetchOutcome::Completed)
            }
        }
    }
}

/// One-shot form of `FetchPool::prefetch`.
pub async fn prefetch<E: FetchExecutor + ?Sized + 'static>(
    executor: Arc<E>,
    tasks: Vec<FetchTask>,
    workers: usize,
    cancel: &CancelToken,
) -> Result<PrefetchOutcome, PoolError> {
    FetchPool::new(executor, PoolConfig::new(workers))?
        .prefetch(tasks, cancel)
        .await
}

struct Worker<E: ?Sized> {
    id: usize,
    executor: Arc<E>,
    queue: Arc<Mutex<mpsc::Receiver<FetchTask>>>,
    errors: mpsc::Sender<PoolError>,
    cancel: CancelToken,
    observer: Arc<dyn ProgressObserver>,
    completed: Arc<AtomicUsize>,
    total: usize,
}

impl<E: FetchExecutor + ?Sized> Worker<E> {
    async fn run(self) {
        loop {
            let claimed = {
                let mut queue = self.queue.lock().await;
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => None,
                    task = queue.recv() => task,
                }
            };
            let Some(task) = claimed else {
                return;
            };

            match self.executor.execute(task).await {
                Ok(()) => {
                    let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
                    self.observer.on_task_complete(done, self.total);
                }
                Err(source) => {
                    tracing::debug!("[mz-02] worker {} failed on {}: {}", self.id, task, source);
                    // Capacity equals the worker count and each worker sends
                    // at most once, so this never blocks.
                    let _ = self.errors.try_send(PoolError::Fetch { task, source });
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
