//! Prefetch progress as throttled log lines on stderr.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mz_02_fetch_pool::{NoProgress, ProgressObserver};

/// Logs once per completed tenth of the task list.
#[derive(Debug, Default)]
pub struct LogProgress {
    reported_tenths: AtomicUsize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for LogProgress {
    fn on_start(&self, total: usize) {
        tracing::info!("caching {} blocks", total);
    }

    fn on_task_complete(&self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let tenths = done * 10 / total;
        // Workers race here; only the one that advances the counter logs.
        let prev = self.reported_tenths.fetch_max(tenths, Ordering::Relaxed);
        if tenths > prev {
            tracing::info!("cached {}/{} ({}%)", done, total, tenths * 10);
        }
    }
}

/// Observer for the `--disable-progress-bar` flag.
pub fn observer(disabled: bool) -> Arc<dyn ProgressObserver> {
    if disabled {
        Arc::new(NoProgress)
    } else {
        Arc::new(LogProgress::new())
    }
}
