//! Single-flight TTL cache for the adjusted-odds snapshot.
//!
//! One slot, guarded by an async mutex held across the refresh itself:
//! concurrent readers that observe a stale slot queue on the lock, the first
//! one refreshes, and the rest return the leader's snapshot without firing
//! their own refresh. A forced refresh takes the same lock, so it collapses
//! with an in-flight automatic one.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::Snapshot;
use crate::error::Result;

/// Producer of a fresh snapshot. Trait seam so the cache can be tested
/// without the pipeline.
#[async_trait]
pub trait SnapshotRefresher: Send + Sync {
    async fn refresh(&self) -> Result<Snapshot>;
}

struct CachedSnapshot {
    snapshot: Arc<Snapshot>,
    fetched_at: Instant,
}

pub struct SnapshotCache {
    ttl: Duration,
    slot: Mutex<Option<CachedSnapshot>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the live snapshot if it is within TTL, otherwise refresh
    /// synchronously and return the fresh one.
    pub async fn get_or_refresh(
        &self,
        refresher: &dyn SnapshotRefresher,
    ) -> Result<Arc<Snapshot>> {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.snapshot));
            }
        }
        self.refresh_locked(&mut slot, refresher).await
    }

    /// Refresh unconditionally, replacing whatever is cached.
    pub async fn force_refresh(
        &self,
        refresher: &dyn SnapshotRefresher,
    ) -> Result<Arc<Snapshot>> {
        let mut slot = self.slot.lock().await;
        self.refresh_locked(&mut slot, refresher).await
    }

    async fn refresh_locked(
        &self,
        slot: &mut Option<CachedSnapshot>,
        refresher: &dyn SnapshotRefresher,
    ) -> Result<Arc<Snapshot>> {
        // Discard the stale snapshot up front: a failed refresh must surface
        // as an error, not quietly serve yesterday's numbers.
        *slot = None;

        match refresher.refresh().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *slot = Some(CachedSnapshot {
                    snapshot: Arc::clone(&snapshot),
                    fetched_at: Instant::now(),
                });
                info!(
                    players = snapshot.summary.players,
                    "snapshot cache refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!("snapshot refresh failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Methodology, SourceInfo, Summary};
    use crate::error::TdError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn empty_snapshot() -> Snapshot {
        Snapshot {
            analysis_date: "2026-01-01 00:00:00 UTC".to_string(),
            source: SourceInfo {
                team_projections_url: "http://example/team-analysis".to_string(),
                odds_api: "the-odds-api.com".to_string(),
                bookmaker_priority: vec!["fanduel".to_string()],
            },
            summary: Summary {
                players: 0,
                teams_with_boosts: 0,
            },
            methodology: Methodology::default(),
            players: vec![],
        }
    }

    struct StubRefresher {
        calls: AtomicUsize,
        fail: AtomicBool,
        delay: Duration,
    }

    impl StubRefresher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl SnapshotRefresher for StubRefresher {
        async fn refresh(&self) -> Result<Snapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(TdError::UpstreamUnavailable("stub down".to_string()));
            }
            Ok(empty_snapshot())
        }
    }

    #[tokio::test]
    async fn test_fresh_snapshot_reused_within_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(3600));
        let refresher = StubRefresher::new();

        let first = cache.get_or_refresh(&refresher).await.unwrap();
        let second = cache.get_or_refresh(&refresher).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_snapshot_triggers_refresh() {
        let cache = SnapshotCache::new(Duration::from_millis(20));
        let refresher = StubRefresher::new();

        let first = cache.get_or_refresh(&refresher).await.unwrap();
        std::thread::sleep(Duration::from_millis(30));
        let second = cache.get_or_refresh(&refresher).await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_stale_readers_collapse_to_one_refresh() {
        let cache = Arc::new(SnapshotCache::new(Duration::from_secs(3600)));
        let refresher = Arc::new(StubRefresher::with_delay(Duration::from_millis(50)));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let cache = Arc::clone(&cache);
            let refresher = Arc::clone(&refresher);
            handles.push(tokio::spawn(async move {
                cache.get_or_refresh(refresher.as_ref()).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_discards_previous_snapshot() {
        let cache = SnapshotCache::new(Duration::from_secs(3600));
        let refresher = StubRefresher::new();

        cache.get_or_refresh(&refresher).await.unwrap();

        // A forced refresh that fails must not leave the old snapshot behind
        refresher.fail.store(true, Ordering::SeqCst);
        assert!(cache.force_refresh(&refresher).await.is_err());
        assert!(cache.get_or_refresh(&refresher).await.is_err());

        // Once the upstream recovers, reads work again
        refresher.fail.store(false, Ordering::SeqCst);
        assert!(cache.get_or_refresh(&refresher).await.is_ok());
    }

    #[tokio::test]
    async fn test_forced_refresh_replaces_fresh_snapshot() {
        let cache = SnapshotCache::new(Duration::from_secs(3600));
        let refresher = StubRefresher::new();

        let first = cache.get_or_refresh(&refresher).await.unwrap();
        let forced = cache.force_refresh(&refresher).await.unwrap();

        assert!(!Arc::ptr_eq(&first, &forced));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 2);
    }
}
