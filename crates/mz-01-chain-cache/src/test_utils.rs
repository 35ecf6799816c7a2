//! # Test Utilities
//!
//! `MockRemote` and record fixtures, shared with downstream crates through
//! the `test-utils` feature.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    ApplicationLog, BlockIndex, BlockRecord, Execution, Hash256, NetworkId, NotificationEvent,
    RemoteError, ScriptHash, StackItem,
};

use crate::ports::outbound::RemoteSource;

/// Deterministic hash derived from a seed and a salt.
pub fn make_hash(seed: u32, salt: u8) -> Hash256 {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&seed.to_be_bytes());
    bytes[4] = salt;
    bytes[31] = 0xAB;
    Hash256(bytes)
}

/// Block `index` with `tx_count` transactions.
pub fn make_block(index: BlockIndex, timestamp_ms: u64, tx_count: u8) -> BlockRecord {
    BlockRecord {
        index,
        hash: make_hash(index, 0),
        timestamp_ms,
        transactions: (1..=tx_count).map(|salt| make_hash(index, salt)).collect(),
    }
}

pub fn make_event(emitter: ScriptHash, name: &str, payload: StackItem) -> NotificationEvent {
    NotificationEvent {
        emitter,
        name: name.to_string(),
        payload,
    }
}

/// Log for `subject` with one `Application` execution holding `events`.
pub fn log_for(subject: Hash256, events: Vec<NotificationEvent>) -> ApplicationLog {
    ApplicationLog {
        subject,
        executions: vec![Execution {
            trigger: "Application".into(),
            vm_state: "HALT".into(),
            notifications: events,
        }],
    }
}

/// Log of block `seed`'s own hash, one event per name from a fixed emitter.
pub fn make_log(seed: u32, names: &[&str]) -> ApplicationLog {
    let events = names
        .iter()
        .map(|name| make_event(ScriptHash([0x11; 20]), name, StackItem::Array(Vec::new())))
        .collect();
    log_for(make_hash(seed, 0), events)
}

/// NEP-17 style `Transfer` payload. `None` marks a mint or burn side.
pub fn transfer_payload(from: Option<[u8; 20]>, to: Option<[u8; 20]>, amount: i64) -> StackItem {
    let side = |account: Option<[u8; 20]>| match account {
        Some(bytes) => StackItem::ByteString(bytes.to_vec()),
        None => StackItem::Any,
    };
    StackItem::Array(vec![side(from), side(to), StackItem::Integer(amount.to_string())])
}

/// In-memory remote chain with call counters and failure injection.
pub struct MockRemote {
    network: NetworkId,
    blocks: RwLock<HashMap<BlockIndex, BlockRecord>>,
    logs: RwLock<HashMap<Hash256, ApplicationLog>>,
    fail_on: RwLock<HashSet<BlockIndex>>,
    delay: RwLock<Option<Duration>>,
    block_fetches: AtomicUsize,
    log_fetches: AtomicUsize,
}

impl MockRemote {
    pub fn new(network: NetworkId) -> Self {
        Self {
            network,
            blocks: RwLock::new(HashMap::new()),
            logs: RwLock::new(HashMap::new()),
            fail_on: RwLock::new(HashSet::new()),
            delay: RwLock::new(None),
            block_fetches: AtomicUsize::new(0),
            log_fetches: AtomicUsize::new(0),
        }
    }

    /// Chain whose block `i` has timestamp `timestamps[i]`, no transactions
    /// and an empty own log.
    pub fn with_timestamps(network: NetworkId, timestamps: &[u64]) -> Self {
        let remote = Self::new(network);
        for (i, ts) in timestamps.iter().enumerate() {
            let block = make_block(i as BlockIndex, *ts, 0);
            remote.add_log(log_for(block.hash, Vec::new()));
            remote.add_block(block);
        }
        remote
    }

    pub fn add_block(&self, block: BlockRecord) {
        self.blocks.write().insert(block.index, block);
    }

    pub fn add_log(&self, log: ApplicationLog) {
        self.logs.write().insert(log.subject, log);
    }

    /// Make every fetch of block `index` fail with a transport error.
    pub fn fail_on(&self, index: BlockIndex) {
        self.fail_on.write().insert(index);
    }

    /// Sleep before answering each fetch.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write() = Some(delay);
    }

    pub fn block_fetches(&self) -> usize {
        self.block_fetches.load(Ordering::SeqCst)
    }

    pub fn log_fetches(&self) -> usize {
        self.log_fetches.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteSource for MockRemote {
    async fn fetch_block_by_index(&self, index: BlockIndex) -> Result<BlockRecord, RemoteError> {
        self.block_fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_on.read().contains(&index) {
            return Err(RemoteError::Transport(format!("injected failure at block {}", index)));
        }
        self.blocks
            .read()
            .get(&index)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("block {}", index)))
    }

    async fn fetch_block_by_hash(&self, hash: &Hash256) -> Result<BlockRecord, RemoteError> {
        self.block_fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.blocks
            .read()
            .values()
            .find(|b| b.hash == *hash)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("block {}", hash)))
    }

    async fn fetch_application_log(&self, hash: &Hash256) -> Result<ApplicationLog, RemoteError> {
        self.log_fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.logs
            .read()
            .get(hash)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("application log {}", hash)))
    }

    async fn height(&self) -> Result<BlockIndex, RemoteError> {
        Ok(self
            .blocks
            .read()
            .keys()
            .max()
            .map(|max| max + 1)
            .unwrap_or(0))
    }

    async fn network_id(&self) -> Result<NetworkId, RemoteError> {
        Ok(self.network)
    }
}
