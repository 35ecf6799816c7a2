//! # Network Namespaces
//!
//! Each network id gets its own store under the cache root:
//! `<root>/<network>.kvlog` or `<root>/<network>.rocksdb`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared_types::NetworkId;

use crate::adapters::FileBackedKVStore;
use crate::domain::config::{CacheConfig, StorageBackend};
use crate::domain::errors::{CacheError, KVStoreError};
use crate::ports::outbound::KeyValueStore;

/// Location of the store for `network` under `root`.
pub fn namespace_path(root: &Path, network: NetworkId, backend: StorageBackend) -> PathBuf {
    root.join(format!("{}.{}", network, backend.extension()))
}

/// Open (creating if needed) the store for `network`.
pub fn open_namespace(
    config: &CacheConfig,
    network: NetworkId,
) -> Result<Arc<dyn KeyValueStore>, CacheError> {
    config.validate()?;
    std::fs::create_dir_all(&config.root_dir)
        .map_err(|e| CacheError::StoreOpen(KVStoreError::from(e)))?;

    let path = namespace_path(&config.root_dir, network, config.backend);
    tracing::debug!(
        "[mz-01] opening {} store for network {} at {}",
        config.backend,
        network,
        path.display()
    );

    match config.backend {
        StorageBackend::File => {
            let store = FileBackedKVStore::open(&path).map_err(CacheError::StoreOpen)?;
            Ok(Arc::new(store))
        }
        StorageBackend::RocksDb => open_rocksdb(&path),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(path: &Path) -> Result<Arc<dyn KeyValueStore>, CacheError> {
    let store = crate::adapters::RocksDbStore::open_default(path).map_err(CacheError::StoreOpen)?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_path: &Path) -> Result<Arc<dyn KeyValueStore>, CacheError> {
    Err(CacheError::StoreOpen(KVStoreError::Unavailable(
        "built without the rocksdb feature".into(),
    )))
}
