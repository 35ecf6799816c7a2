//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the host application provides: the remote chain, the
//! persistent key-value store and the record encoding.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{ApplicationLog, BlockIndex, BlockRecord, Hash256, NetworkId, RemoteError};

use crate::domain::errors::{KVStoreError, SerializationError};
use crate::domain::keys::Bucket;

/// Logical capability of the remote chain.
///
/// Production: `NeoRpcClient` (mz-cli)
/// Testing: `MockRemote` (test_utils)
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_block_by_index(&self, index: BlockIndex) -> Result<BlockRecord, RemoteError>;

    async fn fetch_block_by_hash(&self, hash: &Hash256) -> Result<BlockRecord, RemoteError>;

    async fn fetch_application_log(&self, hash: &Hash256) -> Result<ApplicationLog, RemoteError>;

    /// Number of blocks the remote currently has.
    async fn height(&self) -> Result<BlockIndex, RemoteError>;

    /// Identity of the remote chain; namespaces the local store.
    async fn network_id(&self) -> Result<NetworkId, RemoteError>;
}

#[async_trait]
impl<T: RemoteSource + ?Sized> RemoteSource for Arc<T> {
    async fn fetch_block_by_index(&self, index: BlockIndex) -> Result<BlockRecord, RemoteError> {
        (**self).fetch_block_by_index(index).await
    }

    async fn fetch_block_by_hash(&self, hash: &Hash256) -> Result<BlockRecord, RemoteError> {
        (**self).fetch_block_by_hash(hash).await
    }

    async fn fetch_application_log(&self, hash: &Hash256) -> Result<ApplicationLog, RemoteError> {
        (**self).fetch_application_log(hash).await
    }

    async fn height(&self) -> Result<BlockIndex, RemoteError> {
        (**self).height().await
    }

    async fn network_id(&self) -> Result<NetworkId, RemoteError> {
        (**self).network_id().await
    }
}

/// Durable key-value store with independent buckets.
///
/// Implementations serialize concurrent access themselves; the cache calls
/// them from many workers at once and adds no locking.
///
/// Production: `FileBackedKVStore`, `RocksDbStore`
/// Testing: `InMemoryKVStore`
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` is a clean miss; `Err` is a read failure.
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    fn put(&self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    fn exists(&self, bucket: Bucket, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(bucket, key)?.is_some())
    }

    /// Number of entries in `bucket`.
    fn count(&self, bucket: Bucket) -> Result<usize, KVStoreError>;

    /// Push buffered writes to durable storage.
    fn flush(&self) -> Result<(), KVStoreError> {
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(bucket, key)
    }

    fn put(&self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(bucket, key, value)
    }

    fn exists(&self, bucket: Bucket, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(bucket, key)
    }

    fn count(&self, bucket: Bucket) -> Result<usize, KVStoreError> {
        (**self).count(bucket)
    }

    fn flush(&self) -> Result<(), KVStoreError> {
        (**self).flush()
    }
}

/// Encoding of records before they are sealed and stored.
pub trait RecordSerializer: Send + Sync {
    fn encode_block(&self, block: &BlockRecord) -> Result<Vec<u8>, SerializationError>;

    fn decode_block(&self, data: &[u8]) -> Result<BlockRecord, SerializationError>;

    fn encode_log(&self, log: &ApplicationLog) -> Result<Vec<u8>, SerializationError>;

    fn decode_log(&self, data: &[u8]) -> Result<ApplicationLog, SerializationError>;
}
