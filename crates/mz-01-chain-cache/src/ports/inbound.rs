//! # Inbound Ports (Driving Ports)
//!
//! The read API the rest of the workspace consumes. `ChainCache` implements
//! it; scanners and the fetch pool depend only on this trait.

use async_trait::async_trait;
use shared_types::{ApplicationLog, BlockIndex, BlockRecord, Hash256, NotificationEvent};

use crate::domain::errors::CacheError;

/// Cache-aside access to blocks and application logs.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Block at `index`, from the store or fetched and persisted.
    ///
    /// ## Errors
    ///
    /// - `RemoteFetch`: miss and the remote call failed
    /// - `CacheRead`: the store failed to read
    /// - `CacheCorruption`: stored bytes failed the checksum or decoding
    /// - `CacheWrite`: persisting the fetched block failed
    async fn get_block(&self, index: BlockIndex) -> Result<BlockRecord, CacheError>;

    /// Block by hash. There is no hash index, so this always asks the
    /// remote; the result is still persisted under its index.
    async fn get_block_by_hash(&self, hash: &Hash256) -> Result<BlockRecord, CacheError>;

    /// Application log of a block or transaction hash.
    async fn get_application_log(&self, hash: &Hash256) -> Result<ApplicationLog, CacheError>;

    /// Notifications of one log, in execution order.
    async fn get_notifications(&self, hash: &Hash256) -> Result<Vec<NotificationEvent>, CacheError>;

    /// Notifications of the block's own log followed by each transaction's
    /// log, transactions in block order.
    async fn get_all_notifications(
        &self,
        block: &BlockRecord,
    ) -> Result<Vec<NotificationEvent>, CacheError>;

    /// Current chain height (number of blocks). Never cached.
    async fn height(&self) -> Result<BlockIndex, CacheError>;
}
