//! # Domain Layer
//!
//! Pure logic of the cache. No I/O here.
//!
//! ## Modules
//!
//! - `keys` - Buckets, key layout and the checksum envelope around values
//! - `config` - Cache configuration and storage backend selection
//! - `errors` - Cache, store and serialization errors

pub mod config;
pub mod errors;
pub mod keys;
