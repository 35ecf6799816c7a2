//! `monza stutter`: report gaps between consecutive block timestamps.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use mz_01_chain_cache::ChainReader;
use mz_02_fetch_pool::{PoolConfig, ProgressObserver};
use mz_04_stutter_detector::{StutterError, StutterScanner};
use shared_types::{BlockRange, CancelToken, ScanStatus};

use super::{resolve_range, warm, ChainArgs, LineSink, Outcome, RangeArgs};
use crate::progress;

#[derive(Debug, Clone, Args)]
pub struct StutterArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Duration limit between block timestamps
    #[arg(short = 't', long, default_value = "20s", value_parser = humantime::parse_duration)]
    pub threshold: Duration,
}

pub async fn execute<W: Write>(
    args: &StutterArgs,
    cancel: &CancelToken,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    let pool = args.range.pool_config()?;
    let interval = args.range.interval()?;
    let (_client, cache) = args.chain.open().await?;
    let cache = Arc::new(cache);

    let range = resolve_range(&interval, cache.as_ref()).await?;
    let outcome = detect(
        cache.clone(),
        range,
        args.threshold,
        pool,
        progress::observer(args.range.disable_progress_bar),
        cancel,
        out,
    )
    .await;
    cache.flush().context("cannot flush cache")?;
    outcome
}

/// Prefetch the blocks of `range`, then print every stutter above
/// `threshold`.
pub async fn detect<C: ChainReader + 'static, W: Write>(
    cache: Arc<C>,
    range: BlockRange,
    threshold: Duration,
    pool: PoolConfig,
    observer: Arc<dyn ProgressObserver>,
    cancel: &CancelToken,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    tracing::info!(
        "looking for stutters above {} in blocks [{}, {})",
        humantime::format_duration(threshold),
        range.start(),
        range.end()
    );
    if range.len() < 2 {
        return Err(StutterError::InsufficientRange {
            blocks: range.len(),
        }
        .into());
    }
    if warm(cache.clone(), range, false, pool, observer, cancel).await? == Outcome::Interrupted {
        return Ok(Outcome::Interrupted);
    }

    let mut sink = LineSink::new(out);
    let status = StutterScanner::new(cache.as_ref(), threshold)
        .scan(range, cancel, |report| sink.line(report))
        .await?;
    sink.finish()?;

    Ok(match status {
        ScanStatus::Completed => Outcome::Completed,
        ScanStatus::Cancelled => Outcome::Interrupted,
    })
}
