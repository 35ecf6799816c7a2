//! # Search Flow
//!
//! Prefetch a range with logs through the worker pool into the file store,
//! then search it sequentially. The second pass must never touch the remote.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mz_01_chain_cache::ChainReader;
    use mz_02_fetch_pool::{prefetch, PrefetchOutcome};
    use mz_03_notification_matcher::{
        CriteriaSet, DecodedNotification, EmitterFilter, MatchCriteria, NotificationScanner,
    };
    use shared_types::{BlockRange, CancelToken, FetchTask};

    use crate::integration::fixtures::{neofs_chain, open_disk_cache, GAS, NEOFS, TESTNET};

    fn criteria() -> CriteriaSet {
        [
            MatchCriteria::new("NewEpoch", EmitterFilter::Exact(NEOFS)),
            MatchCriteria::new("Transfer", EmitterFilter::Exact(GAS)),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_prefetch_then_search_is_cache_hot() {
        let dir = tempfile::tempdir().unwrap();
        let remote = neofs_chain(TESTNET, 40);
        let cache = Arc::new(open_disk_cache(&remote, dir.path()).await);
        let range = BlockRange::new(10, 30).unwrap();

        let outcome = prefetch(
            cache.clone(),
            FetchTask::for_range(range, true),
            5,
            &CancelToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(outcome, PrefetchOutcome::Completed);

        let blocks_before = remote.block_fetches();
        let logs_before = remote.log_fetches();
        assert_eq!(blocks_before, 20);
        assert_eq!(logs_before, 40);

        let criteria = criteria();
        let matches = NotificationScanner::new(cache.as_ref(), &criteria)
            .search(range)
            .await
            .unwrap();

        assert_eq!(remote.block_fetches(), blocks_before);
        assert_eq!(remote.log_fetches(), logs_before);

        // One transfer per block plus NewEpoch at 10, 15, 20, 25.
        assert_eq!(matches.len(), 24);
        let epochs: Vec<_> = matches
            .iter()
            .filter_map(|m| match m.decoded {
                DecodedNotification::NewEpoch { epoch } => Some((m.block_index, epoch)),
                _ => None,
            })
            .collect();
        assert_eq!(epochs, vec![(10, 2), (15, 3), (20, 4), (25, 5)]);
        assert!(matches
            .windows(2)
            .all(|w| w[0].block_index <= w[1].block_index));
    }

    #[tokio::test]
    async fn test_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let remote = neofs_chain(TESTNET, 12);
        let range = BlockRange::new(0, 12).unwrap();

        {
            let cache = Arc::new(open_disk_cache(&remote, dir.path()).await);
            prefetch(cache.clone(), FetchTask::for_range(range, true), 3, &CancelToken::new())
                .await
                .unwrap();
            cache.flush().unwrap();
        }
        let fetched = (remote.block_fetches(), remote.log_fetches());

        let reopened = open_disk_cache(&remote, dir.path()).await;
        for index in range.iter() {
            let block = reopened.get_block(index).await.unwrap();
            reopened.get_all_notifications(&block).await.unwrap();
        }
        assert_eq!((remote.block_fetches(), remote.log_fetches()), fetched);
        assert_eq!(reopened.stats().misses, 0);
    }

    #[tokio::test]
    async fn test_failed_prefetch_keeps_completed_work() {
        let dir = tempfile::tempdir().unwrap();
        let remote = neofs_chain(TESTNET, 10);
        remote.fail_on(7);
        let cache = Arc::new(open_disk_cache(&remote, dir.path()).await);

        let err = prefetch(
            cache.clone(),
            FetchTask::for_range(BlockRange::new(0, 10).unwrap(), false),
            1,
            &CancelToken::new(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("block 7"));

        // A single worker processes tasks in order, so 0..7 are stored.
        let before = remote.block_fetches();
        for index in 0..7 {
            cache.get_block(index).await.unwrap();
        }
        assert_eq!(remote.block_fetches(), before);
    }
}
