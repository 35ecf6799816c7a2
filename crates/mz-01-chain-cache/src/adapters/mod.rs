//! # Adapters Module
//!
//! - `storage`: `KeyValueStore` backends (in-memory, append-log file, RocksDB)
//! - `serializer`: `RecordSerializer` used by default

pub mod serializer;
pub mod storage;

pub use serializer::StandardRecordSerializer;
pub use storage::{FileBackedKVStore, InMemoryKVStore};
#[cfg(feature = "rocksdb")]
pub use storage::RocksDbStore;
