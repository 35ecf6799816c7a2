//! # Chain Cache (mz-01)
//!
//! Read-through / write-through cache of finalized blocks and application
//! logs. A lookup reads the local store first; on a miss it fetches from the
//! remote chain, persists the record, then returns it.
//!
//! ```text
//!   caller ──get_block(i)──→ ChainCache ──get──→ KeyValueStore
//!                                │   miss
//!                                ├──fetch──→ RemoteSource
//!                                └──put────→ KeyValueStore
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Finality | Stored content is a pure function of its key |
//! | 2 | Namespaces | One store per network id; chains never share entries |
//! | 3 | Integrity | Checksum verified on every read; a bad entry is an error, never a miss |
//! | 4 | Order | Block keys are fixed-width big-endian and sort by index |
//! | 5 | No single-flight | Concurrent misses for one key may both fetch; writes are idempotent |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Keys, integrity envelope, config, errors
//! - `ports/` - `ChainReader` (inbound), `RemoteSource` / `KeyValueStore` /
//!   `RecordSerializer` (outbound)
//! - `adapters/` - Store backends and the record serializer
//! - `service.rs` - `ChainCache`, the application service
//! - `namespace.rs` - Opening the store for one network under a root dir

pub mod adapters;
pub mod domain;
pub mod namespace;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{FileBackedKVStore, InMemoryKVStore, StandardRecordSerializer};
#[cfg(feature = "rocksdb")]
pub use adapters::RocksDbStore;
pub use domain::config::{CacheConfig, StorageBackend};
pub use domain::errors::{CacheError, KVStoreError, SerializationError};
pub use domain::keys::Bucket;
pub use namespace::{namespace_path, open_namespace};
pub use ports::inbound::ChainReader;
pub use ports::outbound::{KeyValueStore, RecordSerializer, RemoteSource};
pub use service::{CacheStats, ChainCache};
