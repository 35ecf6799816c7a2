//! # Command Line Configuration

use std::path::PathBuf;
use std::time::Duration;

use shared_types::ConfigError;

/// Where and how to reach the node.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:30333".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RpcConfig {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "rpc endpoint must be an http(s) url, got {}",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("rpc timeout must be positive".into()));
        }
        Ok(())
    }
}

/// `$HOME/.config/monza`.
pub fn default_cache_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".config").join("monza"))
        .ok_or_else(|| ConfigError::Invalid("cannot determine home directory".into()))
}
