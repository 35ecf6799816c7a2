use mz_01_chain_cache::CacheError;
use shared_types::BlockIndex;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StutterError {
    #[error("range must contain at least two blocks, got {blocks}")]
    InsufficientRange { blocks: usize },

    #[error("cannot fetch block {block}: {source}")]
    Fetch {
        block: BlockIndex,
        #[source]
        source: CacheError,
    },
}
