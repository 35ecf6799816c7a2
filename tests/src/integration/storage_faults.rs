//! # Storage Faults
//!
//! Per-network namespaces, on-disk corruption and exclusive store locking.

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::{Seek, SeekFrom, Write};

    use mz_01_chain_cache::test_utils::MockRemote;
    use mz_01_chain_cache::domain::keys::{block_key, log_key, seal};
    use mz_01_chain_cache::{
        namespace_path, Bucket, CacheConfig, CacheError, ChainCache, ChainReader, KVStoreError,
        KeyValueStore, StorageBackend,
    };
    use shared_types::NetworkId;
    use std::sync::Arc;

    use crate::integration::fixtures::{open_disk_cache, TESTNET, T0};

    #[tokio::test]
    async fn test_networks_never_share_records() {
        let dir = tempfile::tempdir().unwrap();
        let mainnet = Arc::new(MockRemote::with_timestamps(NetworkId(860_833_102), &[T0, T0 + 1]));
        let testnet = Arc::new(MockRemote::with_timestamps(TESTNET, &[T0 + 500, T0 + 501]));

        let main_cache = open_disk_cache(&mainnet, dir.path()).await;
        let test_cache = open_disk_cache(&testnet, dir.path()).await;

        assert_eq!(main_cache.get_block(0).await.unwrap().timestamp_ms, T0);
        assert_eq!(test_cache.get_block(0).await.unwrap().timestamp_ms, T0 + 500);
        assert_eq!(mainnet.block_fetches(), 1);
        assert_eq!(testnet.block_fetches(), 1);

        let main_file = namespace_path(dir.path(), NetworkId(860_833_102), StorageBackend::File);
        let test_file = namespace_path(dir.path(), TESTNET, StorageBackend::File);
        assert_ne!(main_file, test_file);
        assert!(main_file.exists() && test_file.exists());
    }

    fn flip_byte(path: &std::path::Path, at: u64) {
        let mut file = OpenOptions::new().read(true).write(true).open(path).unwrap();
        let mut byte = [0u8; 1];
        file.seek(SeekFrom::Start(at)).unwrap();
        std::io::Read::read_exact(&mut file, &mut byte).unwrap();
        file.seek(SeekFrom::Start(at)).unwrap();
        file.write_all(&[byte[0] ^ 0xFF]).unwrap();
        file.sync_all().unwrap();
    }

    #[tokio::test]
    async fn test_flipped_byte_fails_open_not_miss() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::with_timestamps(TESTNET, &[T0, T0 + 1, T0 + 2]));

        {
            let cache = open_disk_cache(&remote, dir.path()).await;
            for i in 0..3 {
                cache.get_block(i).await.unwrap();
            }
            cache.flush().unwrap();
        }

        // Damage the first record; later records must survive untouched.
        let path = namespace_path(dir.path(), TESTNET, StorageBackend::File);
        flip_byte(&path, 4);
        let damaged = std::fs::read(&path).unwrap();

        let result = ChainCache::open(
            remote.clone(),
            &CacheConfig::new(dir.path(), StorageBackend::File),
        )
        .await;
        match result {
            Err(err @ CacheError::StoreOpen(KVStoreError::CorruptionError { .. })) => {
                assert!(err.is_local());
            }
            Err(other) => panic!("expected store corruption, got {:?}", other),
            Ok(_) => panic!("damaged cache opened"),
        }
        assert_eq!(std::fs::read(&path).unwrap(), damaged);
        assert_eq!(remote.block_fetches(), 3);
    }

    #[tokio::test]
    async fn test_bad_entry_on_disk_is_corruption_not_miss() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::with_timestamps(TESTNET, &[T0, T0 + 1]));
        let block = {
            let cache = open_disk_cache(&remote, dir.path()).await;
            let block = cache.get_block(0).await.unwrap();
            cache
                .store()
                .put(Bucket::Blocks, &block_key(1), &seal(b"not a block"))
                .unwrap();
            cache
                .store()
                .put(Bucket::Logs, &log_key(&block.hash), b"ab")
                .unwrap();
            cache.flush().unwrap();
            block
        };

        let cache = open_disk_cache(&remote, dir.path()).await;
        let err = cache.get_block(1).await.unwrap_err();
        assert!(matches!(err, CacheError::CacheCorruption { .. }));
        let err = cache.get_application_log(&block.hash).await.unwrap_err();
        assert!(matches!(err, CacheError::CacheCorruption { .. }));

        assert_eq!(remote.block_fetches(), 1);
        assert_eq!(remote.log_fetches(), 0);
    }

    #[tokio::test]
    async fn test_namespace_is_locked_while_open() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::with_timestamps(TESTNET, &[T0]));

        let _held = open_disk_cache(&remote, dir.path()).await;
        let second = ChainCache::open(
            remote.clone(),
            &CacheConfig::new(dir.path(), StorageBackend::File),
        )
        .await;
        assert!(matches!(second, Err(CacheError::StoreOpen(_))));
    }
}
