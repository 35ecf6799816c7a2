//! # Subcommands
//!
//! Each command opens the namespaced cache for the node's network, resolves
//! its flags, prefetches the range with the worker pool and then scans it
//! sequentially, writing result lines to the given sink.

pub mod run;
pub mod show;
pub mod stutter;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use mz_01_chain_cache::{CacheConfig, ChainCache, ChainReader, KeyValueStore, StorageBackend};
use mz_02_fetch_pool::{FetchPool, PoolConfig, PrefetchOutcome, ProgressObserver, DEFAULT_WORKERS};
use shared_types::{BlockRange, CancelToken, FetchTask};

use crate::config::{default_cache_dir, RpcConfig};
use crate::interval::BlockInterval;
use crate::rpc::NeoRpcClient;

/// The production cache: JSON-RPC remote over the namespaced store.
pub type NodeCache = ChainCache<Arc<NeoRpcClient>, Arc<dyn KeyValueStore>>;

/// How a command ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
}

/// Node and cache flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ChainArgs {
    /// N3 RPC endpoint
    #[arg(short = 'r', long = "rpc-endpoint")]
    pub rpc_endpoint: String,

    /// Path to the blockchain cache (default: $HOME/.config/monza)
    #[arg(short = 'c', long = "cache")]
    pub cache: Option<PathBuf>,

    /// Cache storage backend (file or rocksdb)
    #[arg(long, default_value = "file")]
    pub backend: StorageBackend,

    /// Timeout of a single RPC request
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub rpc_timeout: Duration,
}

/// Block interval and prefetch flags.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Starting block (can be relative value with minus prefix, e.g. 'm100')
    #[arg(long)]
    pub from: String,

    /// Ending block (can be relative value with plus prefix, e.g. 'p100' or
    /// omitted for latest block in chain)
    #[arg(long)]
    pub to: Option<String>,

    /// Amount of workers for parallel block fetch
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Disable progress output
    #[arg(long)]
    pub disable_progress_bar: bool,
}

impl ChainArgs {
    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig::new(self.rpc_endpoint.clone(), self.rpc_timeout)
    }

    pub fn cache_config(&self) -> anyhow::Result<CacheConfig> {
        let root = match &self.cache {
            Some(dir) => dir.clone(),
            None => default_cache_dir()?,
        };
        Ok(CacheConfig::new(root, self.backend))
    }

    /// Connect to the node and open the cache for its network.
    pub async fn open(&self) -> anyhow::Result<(Arc<NeoRpcClient>, NodeCache)> {
        let rpc = self.rpc_config();
        rpc.validate()?;
        let client = Arc::new(
            NeoRpcClient::new(&rpc).context("cannot initialize remote blockchain client")?,
        );
        let cache = ChainCache::open(client.clone(), &self.cache_config()?)
            .await
            .context("cannot initialize remote blockchain client")?;
        Ok((client, cache))
    }
}

impl RangeArgs {
    pub fn interval(&self) -> anyhow::Result<BlockInterval> {
        Ok(BlockInterval::parse(&self.from, self.to.as_deref())?)
    }

    pub fn pool_config(&self) -> anyhow::Result<PoolConfig> {
        let config = PoolConfig::new(self.workers);
        config.validate()?;
        Ok(config)
    }
}

/// Resolve `interval`, asking the node for its height only when needed.
pub async fn resolve_range<C: ChainReader + ?Sized>(
    interval: &BlockInterval,
    reader: &C,
) -> anyhow::Result<BlockRange> {
    if let Some(range) = interval.resolve_static() {
        return Ok(range);
    }
    let height = reader
        .height()
        .await
        .context("latest block index unavailable")?;
    Ok(interval.resolve_with_height(height)?)
}

/// Warm the cache for `range`.
pub async fn warm<C: ChainReader + 'static>(
    cache: Arc<C>,
    range: BlockRange,
    with_logs: bool,
    pool: PoolConfig,
    observer: Arc<dyn ProgressObserver>,
    cancel: &CancelToken,
) -> anyhow::Result<Outcome> {
    let tasks = FetchTask::for_range(range, with_logs);
    let outcome = FetchPool::new(cache, pool)?
        .with_observer(observer)
        .prefetch(tasks, cancel)
        .await?;
    Ok(match outcome {
        PrefetchOutcome::Completed => Outcome::Completed,
        PrefetchOutcome::Cancelled => Outcome::Interrupted,
    })
}

/// Line writer for scan callbacks, which cannot return errors. Keeps the
/// first write failure and drops every later line.
pub(crate) struct LineSink<'w, W: std::io::Write> {
    out: &'w mut W,
    error: Option<std::io::Error>,
}

impl<'w, W: std::io::Write> LineSink<'w, W> {
    pub(crate) fn new(out: &'w mut W) -> Self {
        Self { out, error: None }
    }

    pub(crate) fn line(&mut self, line: impl std::fmt::Display) {
        if self.error.is_none() {
            if let Err(e) = writeln!(self.out, "{}", line) {
                self.error = Some(e);
            }
        }
    }

    pub(crate) fn finish(self) -> std::io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => self.out.flush(),
        }
    }
}
