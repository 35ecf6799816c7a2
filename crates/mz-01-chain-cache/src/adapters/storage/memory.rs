use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::domain::errors::KVStoreError;
use crate::domain::keys::Bucket;
use crate::ports::outbound::KeyValueStore;

/// In-memory key-value store for unit tests.
///
/// Counts writes so tests can assert write-once behaviour, and can be told
/// to fail reads or writes to exercise the cache's error paths.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: RwLock<HashMap<(Bucket, Vec<u8>), Vec<u8>>>,
    writes: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KVStoreError::IOError {
                message: "injected read failure".into(),
            });
        }
        Ok(self.data.read().get(&(bucket, key.to_vec())).cloned())
    }

    fn put(&self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KVStoreError::IOError {
                message: "injected write failure".into(),
            });
        }
        self.data
            .write()
            .insert((bucket, key.to_vec()), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn count(&self, bucket: Bucket) -> Result<usize, KVStoreError> {
        Ok(self.data.read().keys().filter(|(b, _)| *b == bucket).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_kv_store() {
        let store = InMemoryKVStore::new();

        store.put(Bucket::Blocks, b"key1", b"value1").unwrap();
        store.put(Bucket::Logs, b"key1", b"value2").unwrap();

        assert_eq!(store.get(Bucket::Blocks, b"key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.get(Bucket::Logs, b"key1").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.get(Bucket::Blocks, b"key3").unwrap(), None);

        assert!(store.exists(Bucket::Blocks, b"key1").unwrap());
        assert_eq!(store.count(Bucket::Blocks).unwrap(), 1);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_injected_failures() {
        let store = InMemoryKVStore::new();
        store.set_fail_writes(true);
        assert!(store.put(Bucket::Blocks, b"k", b"v").is_err());
        assert_eq!(store.write_count(), 0);

        store.set_fail_reads(true);
        assert!(store.get(Bucket::Blocks, b"k").is_err());
    }
}
