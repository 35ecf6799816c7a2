//! `monza run`: notification search.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use mz_01_chain_cache::ChainReader;
use mz_02_fetch_pool::{PoolConfig, ProgressObserver};
use mz_03_notification_matcher::{CriteriaSet, NotificationScanner};
use shared_types::{BlockRange, CancelToken, ScanStatus};

use super::{resolve_range, warm, ChainArgs, LineSink, Outcome, RangeArgs};
use crate::criteria::resolve_criteria;
use crate::progress;

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    #[command(flatten)]
    pub range: RangeArgs,

    /// 'notification:contract' pair (specify LE script hash, '*' for any
    /// contract or 'gas' and 'neo' strings)
    #[arg(short = 'n', long = "notification", required = true)]
    pub notifications: Vec<String>,
}

pub async fn execute<W: Write>(
    args: &RunArgs,
    cancel: &CancelToken,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    let pool = args.range.pool_config()?;
    let interval = args.range.interval()?;
    let (client, cache) = args.chain.open().await?;
    let cache = Arc::new(cache);

    let range = resolve_range(&interval, cache.as_ref()).await?;
    let criteria = resolve_criteria(&args.notifications, client.as_ref()).await?;

    let outcome = search(
        cache.clone(),
        range,
        &criteria,
        pool,
        progress::observer(args.range.disable_progress_bar),
        cancel,
        out,
    )
    .await;
    cache.flush().context("cannot flush cache")?;
    outcome
}

/// Prefetch `range` with logs, then print every match in block order.
pub async fn search<C: ChainReader + 'static, W: Write>(
    cache: Arc<C>,
    range: BlockRange,
    criteria: &CriteriaSet,
    pool: PoolConfig,
    observer: Arc<dyn ProgressObserver>,
    cancel: &CancelToken,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    tracing::info!(
        "searching {} notification names in blocks [{}, {})",
        criteria.len(),
        range.start(),
        range.end()
    );
    if warm(cache.clone(), range, true, pool, observer, cancel).await? == Outcome::Interrupted {
        return Ok(Outcome::Interrupted);
    }

    let mut sink = LineSink::new(out);
    let status = NotificationScanner::new(cache.as_ref(), criteria)
        .scan(range, cancel, |m| sink.line(m))
        .await?;
    sink.finish()?;

    Ok(match status {
        ScanStatus::Completed => Outcome::Completed,
        ScanStatus::Cancelled => Outcome::Interrupted,
    })
}
