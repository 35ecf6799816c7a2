//! # Pool Configuration

use shared_types::ConfigError;

/// Default worker count, matching the command line default.
pub const DEFAULT_WORKERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of long-lived workers. Must be at least 1.
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

impl PoolConfig {
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount {
                workers: self.workers,
            });
        }
        Ok(())
    }
}
