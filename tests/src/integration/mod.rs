//! Cross-crate scenarios: mock remote, real store adapters.

pub mod search_flow;
pub mod storage_faults;
pub mod stutter_flow;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;
    use std::sync::Arc;

    use mz_01_chain_cache::test_utils::{
        log_for, make_block, make_event, transfer_payload, MockRemote,
    };
    use mz_01_chain_cache::{CacheConfig, ChainCache, KeyValueStore, StorageBackend};
    use shared_types::{NetworkId, ScriptHash, StackItem};

    pub const TESTNET: NetworkId = NetworkId(877_933_390);
    pub const GAS: ScriptHash = ScriptHash([0x22; 20]);
    pub const NEOFS: ScriptHash = ScriptHash([0x33; 20]);
    pub const T0: u64 = 1_600_000_000_000;

    pub type DiskCache = ChainCache<Arc<MockRemote>, Arc<dyn KeyValueStore>>;

    /// Blocks 15s apart with one transaction each. Every block's own log
    /// carries a GAS transfer; every fifth transaction emits NewEpoch.
    pub fn neofs_chain(network: NetworkId, blocks: u32) -> Arc<MockRemote> {
        let remote = Arc::new(MockRemote::new(network));
        for i in 0..blocks {
            let block = make_block(i, T0 + 15_000 * u64::from(i), 1);
            remote.add_log(log_for(
                block.hash,
                vec![make_event(GAS, "Transfer", transfer_payload(None, Some([5; 20]), 50))],
            ));
            let tx_events = if i % 5 == 0 {
                vec![make_event(
                    NEOFS,
                    "NewEpoch",
                    StackItem::Array(vec![StackItem::Integer((i / 5).to_string())]),
                )]
            } else {
                Vec::new()
            };
            remote.add_log(log_for(block.transactions[0], tx_events));
            remote.add_block(block);
        }
        remote
    }

    pub async fn open_disk_cache(remote: &Arc<MockRemote>, root: &Path) -> DiskCache {
        ChainCache::open(remote.clone(), &CacheConfig::new(root, StorageBackend::File))
            .await
            .unwrap()
    }
}
