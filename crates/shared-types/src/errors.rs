//! # Error Types
//!
//! Errors shared across crates. Crate-specific failures (cache, pool,
//! scanners) wrap these.

use thiserror::Error;

/// Invalid configuration or user input. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Worker count must be positive.
    #[error("invalid amount of workers {workers}")]
    InvalidWorkerCount { workers: usize },

    /// A block range must contain at least one block.
    #[error("empty block range [{start}, {end})")]
    EmptyRange { start: u32, end: u32 },

    /// Interval flags could not be resolved into a range.
    #[error("invalid block interval from:{from} to:{to}")]
    InvalidInterval { from: String, to: String },

    /// A `name:contract` criterion could not be parsed.
    #[error("invalid notification {0}")]
    InvalidCriteria(String),

    /// Catch-all for other invalid settings.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure reported by the remote chain or its transport.
///
/// Not-found is a remote failure too: the cache never invents records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Request could not be delivered or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node has no such block or log.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Invalid textual hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseHashError {
    #[error("expected {expected} hex digits, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    Hex(String),
}
