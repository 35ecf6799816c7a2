//! # RocksDB Storage Adapter
//!
//! One database directory per network, one column family per bucket.
//!
//! ## Column Families
//!
//! - `blocks` - Sealed block records keyed by big-endian index
//! - `logs` - Sealed application logs keyed by raw hash

use std::path::{Path, PathBuf};

use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, DB};

use crate::domain::errors::KVStoreError;
use crate::domain::keys::Bucket;
use crate::ports::outbound::KeyValueStore;

/// RocksDB tuning for the cache workload.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: false; records are refetchable)
    pub sync_writes: bool,
}

impl RocksDbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store.
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
}

fn io_err(context: &str, e: rocksdb::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: format!("RocksDB {} failed: {}", context, e),
    }
}

impl RocksDbStore {
    /// Open or create the database with both column families.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = Bucket::ALL
            .iter()
            .map(|bucket| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(bucket.name(), cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            let message = e.to_string();
            if message.contains("lock") {
                KVStoreError::Locked {
                    path: config.path.display().to_string(),
                }
            } else {
                io_err("open", e)
            }
        })?;

        Ok(Self { db, config })
    }

    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig::new(path.as_ref()))
    }

    fn cf(&self, bucket: Bucket) -> Result<&rocksdb::ColumnFamily, KVStoreError> {
        self.db
            .cf_handle(bucket.name())
            .ok_or_else(|| KVStoreError::CorruptionError {
                message: format!("missing column family {}", bucket.name()),
            })
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let cf = self.cf(bucket)?;
        self.db.get_cf(cf, key).map_err(|e| io_err("get", e))
    }

    fn put(&self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let cf = self.cf(bucket)?;
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        self.db
            .put_cf_opt(cf, key, value, &write_opts)
            .map_err(|e| io_err("put", e))
    }

    fn count(&self, bucket: Bucket) -> Result<usize, KVStoreError> {
        let cf = self.cf(bucket)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(|e| io_err("iterate", e))?;
            count += 1;
        }
        Ok(count)
    }

    fn flush(&self) -> Result<(), KVStoreError> {
        self.db.flush().map_err(|e| io_err("flush", e))
    }
}
