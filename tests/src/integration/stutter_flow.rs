//! # Stutter Flow
//!
//! Block-only prefetch followed by stutter detection over the file store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mz_01_chain_cache::test_utils::MockRemote;
    use mz_02_fetch_pool::{FetchPool, PoolConfig, PrefetchOutcome};
    use mz_04_stutter_detector::{scan_range, StutterReport, StutterScanner};
    use shared_types::{BlockRange, CancelToken, FetchTask, ScanStatus};

    use crate::integration::fixtures::{open_disk_cache, TESTNET, T0};

    /// 15s blocks with two slow ones: 5 -> 6 takes 45s, 16 -> 17 takes 21s.
    fn stuttering_chain() -> Arc<MockRemote> {
        let mut stamps = Vec::new();
        let mut t = T0;
        for i in 0..25u32 {
            stamps.push(t);
            t += match i {
                5 => 45_000,
                16 => 21_000,
                _ => 15_000,
            };
        }
        Arc::new(MockRemote::with_timestamps(TESTNET, &stamps))
    }

    #[tokio::test]
    async fn test_stutter_detection_after_prefetch() {
        let dir = tempfile::tempdir().unwrap();
        let remote = stuttering_chain();
        let cache = Arc::new(open_disk_cache(&remote, dir.path()).await);
        let range = BlockRange::new(0, 25).unwrap();

        let pool = FetchPool::new(cache.clone(), PoolConfig::new(4)).unwrap();
        let outcome = pool
            .prefetch(FetchTask::for_range(range, false), &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, PrefetchOutcome::Completed);
        assert_eq!(remote.block_fetches(), 25);
        assert_eq!(remote.log_fetches(), 0);

        let reports = scan_range(cache.as_ref(), range, Duration::from_secs(20))
            .await
            .unwrap();
        assert_eq!(remote.block_fetches(), 25);

        assert_eq!(reports.len(), 3);
        assert!(matches!(
            reports[0],
            StutterReport::Stutter { prev, curr, delta }
                if prev.index == 5 && curr.index == 6 && delta == Duration::from_secs(45)
        ));
        assert_eq!(reports[1], StutterReport::Skipped { count: 9 });
        assert!(matches!(
            reports[2],
            StutterReport::Stutter { prev, curr, .. } if prev.index == 16 && curr.index == 17
        ));
    }

    #[tokio::test]
    async fn test_raising_threshold_hides_small_stutter() {
        let dir = tempfile::tempdir().unwrap();
        let remote = stuttering_chain();
        let cache = open_disk_cache(&remote, dir.path()).await;

        let reports = scan_range(&cache, BlockRange::new(0, 25).unwrap(), Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_scan_reports_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        let remote = stuttering_chain();
        let cache = open_disk_cache(&remote, dir.path()).await;
        let cancel = CancelToken::new();

        let mut seen = Vec::new();
        let status = StutterScanner::new(&cache, Duration::from_secs(20))
            .scan(BlockRange::new(0, 25).unwrap(), &cancel, |report| {
                // Stop after the first stutter is delivered.
                cancel.cancel();
                seen.push(report);
            })
            .await
            .unwrap();

        assert_eq!(status, ScanStatus::Cancelled);
        assert_eq!(seen.len(), 1);
        assert!(remote.block_fetches() < 25);
    }
}
