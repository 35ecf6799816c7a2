//! # Domain Errors
//!
//! Each cache failure mode is its own variant so callers can tell a flaky
//! remote from a broken disk from a corrupt entry.

use shared_types::{ConfigError, RemoteError};
use thiserror::Error;

/// Errors returned by `ChainCache` operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The remote call failed, including not-found.
    #[error("{subject} fetch: {source}")]
    RemoteFetch {
        subject: String,
        #[source]
        source: RemoteError,
    },

    /// The store failed to read. Distinct from a clean miss.
    #[error("cannot read {subject} from cache: {source}")]
    CacheRead {
        subject: String,
        #[source]
        source: KVStoreError,
    },

    /// The store failed to persist a fetched record.
    #[error("cannot add {subject} to cache: {source}")]
    CacheWrite {
        subject: String,
        #[source]
        source: KVStoreError,
    },

    /// Stored bytes failed the checksum or did not decode.
    #[error("corrupt cache entry for {subject}: {reason}")]
    CacheCorruption { subject: String, reason: String },

    /// The namespaced store could not be opened.
    #[error("cannot open cache store: {0}")]
    StoreOpen(#[source] KVStoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CacheError {
    /// True for failures of the local store rather than the remote.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            CacheError::CacheRead { .. }
                | CacheError::CacheWrite { .. }
                | CacheError::CacheCorruption { .. }
                | CacheError::StoreOpen(_)
        )
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// The store's own structure is damaged.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// Another process holds the store.
    #[error("KV store locked: {path}")]
    Locked { path: String },

    /// The requested backend is not compiled in.
    #[error("KV store backend unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for KVStoreError {
    fn from(err: std::io::Error) -> Self {
        KVStoreError::IOError {
            message: err.to_string(),
        }
    }
}

/// Record encoding or decoding failure.
#[derive(Debug, Clone, Error)]
#[error("serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}
