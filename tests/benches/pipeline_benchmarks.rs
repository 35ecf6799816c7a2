//! # Monza Pipeline Benchmarks
//!
//! | Stage | Measured |
//! |-------|----------|
//! | mz-01 Chain Cache | warm `get_block` and `get_all_notifications` over the in-memory store |
//! | mz-03 Notification Matcher | criteria filtering and payload decoding |
//! | mz-04 Stutter Detector | streaming detection over long ranges |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mz_01_chain_cache::test_utils::{
    log_for, make_block, make_event, transfer_payload, MockRemote,
};
use mz_01_chain_cache::{ChainCache, ChainReader, InMemoryKVStore};
use mz_03_notification_matcher::{
    filter, CriteriaSet, DecodedNotification, EmitterFilter, MatchCriteria,
};
use mz_04_stutter_detector::scan;
use shared_types::{NetworkId, NotificationEvent, ScriptHash};

const GAS: ScriptHash = ScriptHash([0x22; 20]);

fn bench_stutter_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("mz-04-stutter-detector");

    for size in [1_000u32, 10_000, 100_000] {
        let blocks: Vec<_> = (0..size)
            .map(|i| {
                // Every hundredth block is late.
                let slow = u64::from(i / 100) * 30_000;
                make_block(i, 1_600_000_000_000 + u64::from(i) * 15_000 + slow, 0)
            })
            .collect();

        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("scan", size), &blocks, |b, blocks| {
            b.iter(|| black_box(scan(blocks.iter(), Duration::from_secs(20)).unwrap()))
        });
    }
    group.finish();
}

fn bench_notification_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("mz-03-notification-matcher");

    let events: Vec<NotificationEvent> = (0..1_000u32)
        .map(|i| {
            let name = if i % 3 == 0 { "Transfer" } else { "Mint" };
            make_event(GAS, name, transfer_payload(Some([1; 20]), Some([2; 20]), i64::from(i)))
        })
        .collect();
    let criteria: CriteriaSet = [
        MatchCriteria::new("Transfer", EmitterFilter::Exact(GAS)),
        MatchCriteria::new("NewEpoch", EmitterFilter::Any),
    ]
    .into_iter()
    .collect();

    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("filter_1000", |b| {
        b.iter(|| black_box(filter(&criteria, &events).len()))
    });
    group.bench_function("filter_and_decode_1000", |b| {
        b.iter(|| {
            filter(&criteria, &events)
                .into_iter()
                .map(DecodedNotification::decode)
                .count()
        })
    });
    group.finish();
}

fn bench_warm_cache_reads(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let remote = Arc::new(MockRemote::new(NetworkId(1)));
    for i in 0..1_000u32 {
        let block = make_block(i, 1_600_000_000_000 + u64::from(i) * 15_000, 2);
        remote.add_log(log_for(block.hash, Vec::new()));
        for tx in &block.transactions {
            remote.add_log(log_for(
                *tx,
                vec![make_event(GAS, "Transfer", transfer_payload(None, Some([3; 20]), 1))],
            ));
        }
        remote.add_block(block);
    }
    let cache = ChainCache::new(remote, InMemoryKVStore::new());
    runtime.block_on(async {
        for i in 0..1_000 {
            let block = cache.get_block(i).await.unwrap();
            cache.get_all_notifications(&block).await.unwrap();
        }
    });

    let mut group = c.benchmark_group("mz-01-chain-cache");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("warm_block_and_notifications_1000", |b| {
        b.iter(|| {
            runtime.block_on(async {
                for i in 0..1_000 {
                    let block = cache.get_block(i).await.unwrap();
                    black_box(cache.get_all_notifications(&block).await.unwrap());
                }
            })
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_stutter_detection,
    bench_notification_filter,
    bench_warm_cache_reads
);
criterion_main!(benches);
