//! # Chain Cache Service
//!
//! Cache-aside over a `KeyValueStore`: read the store, fall back to the
//! remote on a clean miss, persist, return.
//!
//! A store read failure or a corrupt entry is reported, never treated as a
//! miss. Concurrent misses for the same key may both fetch; the second
//! write stores identical bytes.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use shared_types::{
    ApplicationLog, BlockIndex, BlockRecord, Hash256, NetworkId, NotificationEvent, RemoteError,
};

use crate::adapters::StandardRecordSerializer;
use crate::domain::config::CacheConfig;
use crate::domain::errors::{CacheError, KVStoreError, SerializationError};
use crate::domain::keys::{block_key, log_key, seal, unseal, Bucket};
use crate::namespace::open_namespace;
use crate::ports::inbound::ChainReader;
use crate::ports::outbound::{KeyValueStore, RecordSerializer, RemoteSource};

/// Counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the store.
    pub hits: u64,
    /// Lookups that found nothing in the store.
    pub misses: u64,
    /// Remote record fetches issued. `height` calls are not counted.
    pub remote_fetches: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    remote_fetches: AtomicU64,
}

fn remote_err(subject: &str) -> impl FnOnce(RemoteError) -> CacheError + '_ {
    move |source| CacheError::RemoteFetch {
        subject: subject.to_string(),
        source,
    }
}

/// The chain cache service.
///
/// Generic over the remote, the store and the record encoding so tests can
/// plug in mocks; `open` wires the namespaced production store.
pub struct ChainCache<R, KV, RS = StandardRecordSerializer> {
    remote: R,
    store: KV,
    serializer: RS,
    network: Option<NetworkId>,
    counters: Counters,
}

impl<R, KV> ChainCache<R, KV, StandardRecordSerializer>
where
    R: RemoteSource,
    KV: KeyValueStore,
{
    pub fn new(remote: R, store: KV) -> Self {
        Self::with_serializer(remote, store, StandardRecordSerializer)
    }
}

impl<R: RemoteSource> ChainCache<R, std::sync::Arc<dyn KeyValueStore>, StandardRecordSerializer> {
    /// Ask the remote for its network id and open that network's store
    /// under `config.root_dir`.
    pub async fn open(remote: R, config: &CacheConfig) -> Result<Self, CacheError> {
        let network = remote
            .network_id()
            .await
            .map_err(|source| CacheError::RemoteFetch {
                subject: "network id".into(),
                source,
            })?;
        let store = open_namespace(config, network)?;
        tracing::info!(
            "[mz-01] cache for network {} opened at {}",
            network,
            config.root_dir.display()
        );
        let mut cache = Self::new(remote, store);
        cache.network = Some(network);
        Ok(cache)
    }
}

impl<R, KV, RS> ChainCache<R, KV, RS>
where
    R: RemoteSource,
    KV: KeyValueStore,
    RS: RecordSerializer,
{
    pub fn with_serializer(remote: R, store: KV, serializer: RS) -> Self {
        Self {
            remote,
            store,
            serializer,
            network: None,
            counters: Counters::default(),
        }
    }

    /// Network this cache is namespaced to, when opened through `open`.
    pub fn network(&self) -> Option<NetworkId> {
        self.network
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            remote_fetches: self.counters.remote_fetches.load(Ordering::Relaxed),
        }
    }

    pub fn store(&self) -> &KV {
        &self.store
    }

    /// Flush the underlying store.
    pub fn flush(&self) -> Result<(), CacheError> {
        self.store.flush().map_err(|source| CacheError::CacheWrite {
            subject: "store".into(),
            source,
        })
    }

    /// Stored, verified and decoded entry, or `None` on a clean miss.
    fn read_entry<T>(
        &self,
        bucket: Bucket,
        key: &[u8],
        subject: &str,
        decode: impl FnOnce(&RS, &[u8]) -> Result<T, SerializationError>,
    ) -> Result<Option<T>, CacheError> {
        let stored = self
            .store
            .get(bucket, key)
            .map_err(|source| CacheError::CacheRead {
                subject: subject.to_string(),
                source,
            })?;

        let Some(stored) = stored else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };

        let corrupt = |reason: String| CacheError::CacheCorruption {
            subject: subject.to_string(),
            reason,
        };
        let payload = unseal(&stored).map_err(corrupt)?;
        let value = decode(&self.serializer, payload).map_err(|e| corrupt(e.message))?;
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        Ok(Some(value))
    }

    fn write_entry(
        &self,
        bucket: Bucket,
        key: &[u8],
        subject: &str,
        encoded: Result<Vec<u8>, SerializationError>,
    ) -> Result<(), CacheError> {
        let write_err = |source: KVStoreError| CacheError::CacheWrite {
            subject: subject.to_string(),
            source,
        };
        let payload = encoded.map_err(|e| {
            write_err(KVStoreError::IOError {
                message: format!("encode: {}", e.message),
            })
        })?;
        self.store
            .put(bucket, key, &seal(&payload))
            .map_err(write_err)
    }

    fn store_block(&self, block: &BlockRecord, subject: &str) -> Result<(), CacheError> {
        self.write_entry(
            Bucket::Blocks,
            &block_key(block.index),
            subject,
            self.serializer.encode_block(block),
        )
    }
}

#[async_trait]
impl<R, KV, RS> ChainReader for ChainCache<R, KV, RS>
where
    R: RemoteSource,
    KV: KeyValueStore,
    RS: RecordSerializer,
{
    async fn get_block(&self, index: BlockIndex) -> Result<BlockRecord, CacheError> {
        let subject = format!("block {}", index);
        let key = block_key(index);

        if let Some(block) = self.read_entry(Bucket::Blocks, &key, &subject, |s, b| s.decode_block(b))? {
            return Ok(block);
        }

        tracing::debug!("[mz-01] miss for {}, fetching", subject);
        self.counters.remote_fetches.fetch_add(1, Ordering::Relaxed);
        let block = self
            .remote
            .fetch_block_by_index(index)
            .await
            .map_err(remote_err(&subject))?;

        if block.index != index {
            return Err(CacheError::RemoteFetch {
                subject,
                source: RemoteError::Malformed(format!(
                    "asked for block {}, got block {}",
                    index, block.index
                )),
            });
        }

        self.store_block(&block, &subject)?;
        Ok(block)
    }

    async fn get_block_by_hash(&self, hash: &Hash256) -> Result<BlockRecord, CacheError> {
        let subject = format!("block {}", hash);

        self.counters.remote_fetches.fetch_add(1, Ordering::Relaxed);
        let block = self
            .remote
            .fetch_block_by_hash(hash)
            .await
            .map_err(remote_err(&subject))?;

        if block.hash != *hash {
            return Err(CacheError::RemoteFetch {
                subject,
                source: RemoteError::Malformed(format!("got block {}", block.hash)),
            });
        }

        let key = block_key(block.index);
        let stored = self
            .store
            .exists(Bucket::Blocks, &key)
            .map_err(|source| CacheError::CacheRead {
                subject: subject.clone(),
                source,
            })?;
        if !stored {
            self.store_block(&block, &subject)?;
        }
        Ok(block)
    }

    async fn get_application_log(&self, hash: &Hash256) -> Result<ApplicationLog, CacheError> {
        let subject = format!("application log {}", hash);
        let key = log_key(hash);

        if let Some(log) = self.read_entry(Bucket::Logs, &key, &subject, |s, b| s.decode_log(b))? {
            return Ok(log);
        }

        tracing::debug!("[mz-01] miss for {}, fetching", subject);
        self.counters.remote_fetches.fetch_add(1, Ordering::Relaxed);
        let log = self
            .remote
            .fetch_application_log(hash)
            .await
            .map_err(remote_err(&subject))?;

        if log.subject != *hash {
            return Err(CacheError::RemoteFetch {
                subject,
                source: RemoteError::Malformed(format!("got log for {}", log.subject)),
            });
        }

        self.write_entry(Bucket::Logs, &key, &subject, self.serializer.encode_log(&log))?;
        Ok(log)
    }

    async fn get_notifications(&self, hash: &Hash256) -> Result<Vec<NotificationEvent>, CacheError> {
        let log = self.get_application_log(hash).await?;
        Ok(log.notifications().cloned().collect())
    }

    async fn get_all_notifications(
        &self,
        block: &BlockRecord,
    ) -> Result<Vec<NotificationEvent>, CacheError> {
        let mut events = Vec::new();
        for subject in block.log_subjects() {
            events.extend(self.get_notifications(&subject).await?);
        }
        Ok(events)
    }

    async fn height(&self) -> Result<BlockIndex, CacheError> {
        self.remote
            .height()
            .await
            .map_err(remote_err("chain height"))
    }
}
