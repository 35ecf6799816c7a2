//! # Shared Types Crate
//!
//! Types shared by every Monza crate: chain records as the cache persists
//! them, notification payloads, prefetch tasks, block ranges and the
//! cooperative cancellation token.
//!
//! ## Design Principles
//!
//! - **Finality**: a `BlockRecord` or `ApplicationLog` is a pure function of
//!   its key. Nothing here models reorganisations.
//! - **Explicit cancellation**: the `CancelToken` is passed into every call
//!   that can suspend. There is no global stop flag.
//! - **Closed payloads**: `StackItem` is an exhaustive tagged value, decoded
//!   once at the RPC boundary.

pub mod cancel;
pub mod entities;
pub mod errors;
pub mod range;
pub mod stack_item;
pub mod time;

pub use cancel::{CancelToken, ScanStatus};
pub use entities::*;
pub use errors::*;
pub use range::BlockRange;
pub use stack_item::{MapEntry, StackItem};
pub use time::format_timestamp;
