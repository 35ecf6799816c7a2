use mz_01_chain_cache::CacheError;
use shared_types::BlockIndex;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("cannot fetch notifications from block {block}: {source}")]
    Fetch {
        block: BlockIndex,
        #[source]
        source: CacheError,
    },
}
