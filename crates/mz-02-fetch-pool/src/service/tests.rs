//! # Fetch Pool Tests

use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use super::*;
use async_trait::async_trait;
use mz_01_chain_cache::CacheError;
use mz_01_chain_cache::test_utils::{log_for, make_block, MockRemote};
use mz_01_chain_cache::{Bucket, ChainCache, ChainReader, InMemoryKVStore, KeyValueStore};
use shared_types::{BlockRange, ConfigError, NetworkId};

type TestCache = ChainCache<Arc<MockRemote>, Arc<InMemoryKVStore>>;

fn make_cache(blocks: u32, tx_count: u8) -> (Arc<TestCache>, Arc<MockRemote>, Arc<InMemoryKVStore>) {
    let remote = Arc::new(MockRemote::new(NetworkId(7)));
    for i in 0..blocks {
        let block = make_block(i, 15_000 * u64::from(i), tx_count);
        remote.add_log(log_for(block.hash, Vec::new()));
        for tx in &block.transactions {
            remote.add_log(log_for(*tx, Vec::new()));
        }
        remote.add_block(block);
    }
    let store = Arc::new(InMemoryKVStore::new());
    let cache = Arc::new(ChainCache::new(remote.clone(), store.clone()));
    (cache, remote, store)
}

fn range(start: u32, end: u32) -> BlockRange {
    BlockRange::new(start, end).unwrap()
}

#[tokio::test]
async fn test_prefetch_warms_every_block() {
    let (cache, remote, _store) = make_cache(101, 0);
    let tasks = FetchTask::for_range(range(1, 101), false);

    let outcome = prefetch(cache.clone(), tasks, 10, &CancelToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, PrefetchOutcome::Completed);
    assert_eq!(remote.block_fetches(), 100);

    for i in 1..101 {
        cache.get_block(i).await.unwrap();
    }
    assert_eq!(remote.block_fetches(), 100);
}

#[tokio::test]
async fn test_prefetch_with_logs_warms_transaction_logs() {
    let (cache, remote, _store) = make_cache(10, 3);
    let tasks = FetchTask::for_range(range(0, 10), true);

    prefetch(cache.clone(), tasks, 4, &CancelToken::new())
        .await
        .unwrap();
    assert_eq!(remote.log_fetches(), 10 * 4);

    let block = cache.get_block(5).await.unwrap();
    cache.get_all_notifications(&block).await.unwrap();
    assert_eq!(remote.log_fetches(), 10 * 4);
}

#[tokio::test]
async fn test_first_error_is_returned() {
    let (cache, remote, _store) = make_cache(101, 0);
    remote.fail_on(57);
    let tasks = FetchTask::for_range(range(1, 101), false);

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        prefetch(cache, tasks, 10, &CancelToken::new()),
    )
    .await
    .expect("prefetch hung");

    match result {
        Err(PoolError::Fetch { task, source }) => {
            assert_eq!(task, FetchTask::Block(57));
            assert!(source.to_string().contains("block 57"));
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let (cache, remote, _store) = make_cache(100, 0);
    let cancel = CancelToken::new();
    cancel.cancel();

    let outcome = prefetch(cache, FetchTask::for_range(range(0, 100), false), 10, &cancel)
        .await
        .unwrap();
    assert_eq!(outcome, PrefetchOutcome::Cancelled);
    assert_eq!(remote.block_fetches(), 0);
}

#[tokio::test]
async fn test_cancel_during_prefetch_returns_promptly() {
    let (cache, remote, _store) = make_cache(1_000, 0);
    remote.set_delay(Duration::from_millis(20));
    let cancel = CancelToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        prefetch(cache, FetchTask::for_range(range(0, 1_000), false), 2, &cancel),
    )
    .await
    .expect("prefetch ignored cancellation")
    .unwrap();

    assert!(outcome.is_cancelled());
    assert!(remote.block_fetches() < 1_000);
}

#[tokio::test]
async fn test_zero_workers_is_config_error() {
    let (cache, _remote, _store) = make_cache(1, 0);
    let result = prefetch(cache, vec![FetchTask::Block(0)], 0, &CancelToken::new()).await;
    assert!(matches!(
        result,
        Err(PoolError::Config(ConfigError::InvalidWorkerCount { workers: 0 }))
    ));
}

#[tokio::test]
async fn test_duplicate_tasks_are_tolerated() {
    let (cache, _remote, store) = make_cache(3, 0);
    let tasks = vec![FetchTask::Block(1); 20];

    let outcome = prefetch(cache, tasks, 5, &CancelToken::new()).await.unwrap();
    assert_eq!(outcome, PrefetchOutcome::Completed);
    assert_eq!(store.count(Bucket::Blocks).unwrap(), 1);
}

struct CountingObserver {
    started: AtomicUsize,
    last: AtomicUsize,
}

impl ProgressObserver for CountingObserver {
    fn on_start(&self, total: usize) {
        self.started.store(total, Ordering::SeqCst);
    }

    fn on_task_complete(&self, done: usize, _total: usize) {
        self.last.fetch_max(done, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_observer_sees_every_completion() {
    let (cache, _remote, _store) = make_cache(30, 0);
    let observer = Arc::new(CountingObserver {
        started: AtomicUsize::new(0),
        last: AtomicUsize::new(0),
    });
    let pool = FetchPool::new(cache, PoolConfig::new(4))
        .unwrap()
        .with_observer(observer.clone());

    pool.prefetch(FetchTask::for_range(range(0, 30), false), &CancelToken::new())
        .await
        .unwrap();
    assert_eq!(observer.started.load(Ordering::SeqCst), 30);
    assert_eq!(observer.last.load(Ordering::SeqCst), 30);
}

struct PanickingExecutor;

#[async_trait]
impl FetchExecutor for PanickingExecutor {
    async fn execute(&self, task: FetchTask) -> Result<(), CacheError> {
        panic!("executor blew up on {}", task);
    }
}

#[tokio::test]
async fn test_panicking_workers_abort_instead_of_hanging() {
    let tasks = FetchTask::for_range(range(0, 5), false);

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        prefetch(Arc::new(PanickingExecutor), tasks, 1, &CancelToken::new()),
    )
    .await
    .expect("prefetch hung after every worker panicked");

    assert!(matches!(result, Err(PoolError::WorkerAborted(_))));
}

#[tokio::test]
async fn test_panics_across_several_workers_are_reported() {
    let tasks = FetchTask::for_range(range(0, 50), false);

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        prefetch(Arc::new(PanickingExecutor), tasks, 4, &CancelToken::new()),
    )
    .await
    .expect("prefetch hung after every worker panicked");

    assert!(matches!(result, Err(PoolError::WorkerAborted(_))));
}
