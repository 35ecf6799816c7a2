//! `monza show`: print one block with its transactions and notifications.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use mz_01_chain_cache::ChainReader;
use shared_types::{format_timestamp, BlockIndex, Hash256};

use super::ChainArgs;

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Block index or 0x-prefixed block hash
    pub block: String,
}

/// Block reference as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Index(BlockIndex),
    Hash(Hash256),
}

impl BlockRef {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        if raw.starts_with("0x") || raw.starts_with("0X") {
            let hash = raw
                .parse()
                .with_context(|| format!("invalid block hash {}", raw))?;
            return Ok(BlockRef::Hash(hash));
        }
        let index = raw
            .parse()
            .with_context(|| format!("invalid block index {}", raw))?;
        Ok(BlockRef::Index(index))
    }
}

pub async fn execute<W: Write>(args: &ShowArgs, out: &mut W) -> anyhow::Result<()> {
    let block = BlockRef::parse(&args.block)?;
    let (_client, cache) = args.chain.open().await?;
    show(&cache, block, out).await?;
    cache.flush().context("cannot flush cache")?;
    Ok(())
}

pub async fn show<C: ChainReader + ?Sized, W: Write>(
    reader: &C,
    block: BlockRef,
    out: &mut W,
) -> anyhow::Result<()> {
    let block = match block {
        BlockRef::Index(index) => reader.get_block(index).await,
        BlockRef::Hash(hash) => reader.get_block_by_hash(&hash).await,
    }
    .context("cannot fetch block")?;

    writeln!(
        out,
        "block:{} at:{} hash:{}",
        block.index,
        format_timestamp(block.timestamp_ms),
        block.hash
    )?;
    for tx in &block.transactions {
        writeln!(out, "tx:{}", tx)?;
    }

    let events = reader
        .get_all_notifications(&block)
        .await
        .with_context(|| format!("cannot fetch notifications from block {}", block.index))?;
    for event in events {
        writeln!(out)?;
        writeln!(out, "{} (emitter {})", event.name, event.emitter)?;
        writeln!(out, "---")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&event.payload)?)?;
    }
    out.flush()?;
    Ok(())
}
