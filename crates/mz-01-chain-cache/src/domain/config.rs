//! # Cache Configuration

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use shared_types::ConfigError;

/// Which store adapter backs a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Append-only record log, one file per network.
    #[default]
    File,
    /// RocksDB directory with `blocks` / `logs` column families.
    RocksDb,
}

impl StorageBackend {
    /// Suffix of the namespace file or directory.
    pub fn extension(&self) -> &'static str {
        match self {
            StorageBackend::File => "kvlog",
            StorageBackend::RocksDb => "rocksdb",
        }
    }

    /// Whether this build can open the backend.
    pub fn is_available(&self) -> bool {
        match self {
            StorageBackend::File => true,
            StorageBackend::RocksDb => cfg!(feature = "rocksdb"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::RocksDb => write!(f, "rocksdb"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(ConfigError::Invalid(format!("unknown storage backend {}", other))),
        }
    }
}

/// Where and how the cache persists records.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Storage root. Each network gets its own entry underneath.
    pub root_dir: PathBuf,
    /// Store adapter.
    pub backend: StorageBackend,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./cache"),
            backend: StorageBackend::default(),
        }
    }
}

impl CacheConfig {
    pub fn new(root_dir: impl Into<PathBuf>, backend: StorageBackend) -> Self {
        Self {
            root_dir: root_dir.into(),
            backend,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("empty cache directory".into()));
        }
        if !self.backend.is_available() {
            return Err(ConfigError::Invalid(format!(
                "storage backend {} is not compiled in",
                self.backend
            )));
        }
        Ok(())
    }
}
