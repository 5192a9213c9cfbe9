//! Charger status cache with request deduplication.
//!
//! Live charger data is slow to fetch and changes on the order of minutes,
//! so lookups are cached per station with a fixed TTL. Concurrent lookups
//! for the same station collapse into a single outbound request: callers
//! arriving while a lookup is in flight await the same shared future and
//! observe one outcome, success or failure.
//!
//! Expiry is lazy. A stale entry is never read as a hit, but its bytes stay
//! resident until a fresh lookup overwrites them. Failures never touch the
//! cache, so a caller is always free to retry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{LiveChargerStatus, StationId};
use crate::opendata::StatusError;

/// How long a cached result stays valid: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Upper bound on one outbound lookup, raced against the request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of live charger status data.
///
/// Implemented by the real open-data client and by test doubles. One call
/// to `fetch` corresponds to exactly one outbound lookup.
pub trait StatusSource: Send + Sync + 'static {
    /// Start one outbound lookup for the given station.
    fn fetch(
        &self,
        station: &StationId,
    ) -> BoxFuture<'static, Result<Vec<LiveChargerStatus>, StatusError>>;
}

/// Result of a status lookup, shared between deduplicated callers.
pub type StatusResult = Result<Arc<Vec<LiveChargerStatus>>, StatusError>;

/// Handle to a pending lookup that multiple callers can await.
type SharedLookup = Shared<BoxFuture<'static, StatusResult>>;

/// A cached lookup result with its fetch timestamp.
struct CacheEntry {
    live: Arc<Vec<LiveChargerStatus>>,
    fetched_at: Instant,
}

/// Cache and in-flight maps, guarded together.
///
/// Holding both behind one lock makes the check-then-register sequence in
/// `get_status` atomic with respect to other callers: between suspension
/// points no interleaving can observe a station as both uncached and not
/// in flight and then start a second lookup.
#[derive(Default)]
struct Inner {
    cache: HashMap<StationId, CacheEntry>,
    in_flight: HashMap<StationId, SharedLookup>,
}

/// Configuration for the status cache.
#[derive(Debug, Clone)]
pub struct StatusCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Time bound for one outbound lookup.
    pub fetch_timeout: Duration,
}

impl Default for StatusCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Per-station charger status cache with lookup deduplication.
///
/// Per station id the lifecycle is `Absent → Fetching → {Cached | Absent}`;
/// a `Cached` entry reads as `Absent` again once its TTL elapses. At most
/// one outbound lookup per station is in flight at any instant.
pub struct StatusCache {
    inner: Arc<Mutex<Inner>>,
    source: Arc<dyn StatusSource>,
    ttl: Duration,
    fetch_timeout: Duration,
}

impl StatusCache {
    /// Create a new cache over the given status source.
    pub fn new(source: Arc<dyn StatusSource>, config: &StatusCacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            source,
            ttl: config.ttl,
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// Get the live charger statuses for a station.
    ///
    /// Returns the cached result when fresh, joins an in-flight lookup when
    /// one exists, and otherwise starts exactly one outbound lookup. Every
    /// caller that joins a lookup observes the same result or the same
    /// failure. Failures are not retried here and never populate the cache;
    /// calling again after a failure starts a fresh lookup.
    pub async fn get_status(&self, station: &StationId) -> StatusResult {
        let lookup = {
            let mut inner = self.inner.lock().await;

            if let Some(entry) = inner.cache.get(station)
                && entry.fetched_at.elapsed() < self.ttl
            {
                return Ok(Arc::clone(&entry.live));
            }

            if let Some(existing) = inner.in_flight.get(station) {
                debug!(station = %station, "joining in-flight status lookup");
                existing.clone()
            } else {
                debug!(station = %station, "starting status lookup");
                let lookup = self.start_lookup(station.clone());
                inner.in_flight.insert(station.clone(), lookup.clone());
                lookup
            }
        };

        lookup.await
    }

    /// Build the shared future for one outbound lookup.
    ///
    /// The future itself performs the settlement bookkeeping, so it runs
    /// exactly once no matter how many callers await the shared handle:
    /// the in-flight entry is removed unconditionally, and the cache is
    /// overwritten wholesale only on success.
    ///
    /// A spawned task drives the shared future, so a lookup settles even
    /// when every caller has been dropped mid-flight; settlement never
    /// depends on a caller staying around to poll.
    fn start_lookup(&self, station: StationId) -> SharedLookup {
        let source = Arc::clone(&self.source);
        let inner = Arc::clone(&self.inner);
        let fetch_timeout = self.fetch_timeout;

        let lookup = async move {
            let result = match tokio::time::timeout(fetch_timeout, source.fetch(&station)).await
            {
                Ok(Ok(live)) => Ok(Arc::new(live)),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(StatusError::Timeout),
            };

            let mut inner = inner.lock().await;
            inner.in_flight.remove(&station);

            match &result {
                Ok(live) => {
                    inner.cache.insert(
                        station,
                        CacheEntry {
                            live: Arc::clone(live),
                            fetched_at: Instant::now(),
                        },
                    );
                }
                Err(e) => {
                    debug!(error = %e, "status lookup failed");
                }
            }

            result
        }
        .boxed()
        .shared();

        // Drive the lookup to settlement independently of the callers.
        tokio::spawn(lookup.clone());

        lookup
    }

    /// Number of resident cache entries, stale ones included.
    pub async fn entry_count(&self) -> usize {
        self.inner.lock().await.cache.len()
    }

    /// Drop every cached entry. In-flight lookups are unaffected.
    pub async fn invalidate_all(&self) {
        self.inner.lock().await.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Semaphore;

    use super::*;

    fn station(id: &str) -> StationId {
        StationId::parse(id).unwrap()
    }

    fn live(id: &str, status: &str) -> LiveChargerStatus {
        LiveChargerStatus {
            charger_id: id.to_string(),
            status_code: status.to_string(),
        }
    }

    /// What a `FakeSource` does when its fetch future is driven.
    #[derive(Clone)]
    enum Behaviour {
        /// Resolve immediately with the same records every time.
        Ok(Vec<LiveChargerStatus>),
        /// Resolve immediately with the next queued result.
        Sequence(Arc<StdMutex<VecDeque<Result<Vec<LiveChargerStatus>, StatusError>>>>),
        /// Wait for a semaphore permit, then resolve with the given result.
        Gated(
            Arc<Semaphore>,
            Result<Vec<LiveChargerStatus>, StatusError>,
        ),
        /// Never resolve.
        Hang,
    }

    /// Status source that counts outbound lookups.
    struct FakeSource {
        calls: Arc<AtomicUsize>,
        behaviour: Behaviour,
    }

    impl FakeSource {
        fn new(behaviour: Behaviour) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    behaviour,
                },
                calls,
            )
        }
    }

    impl StatusSource for FakeSource {
        fn fetch(
            &self,
            _station: &StationId,
        ) -> BoxFuture<'static, Result<Vec<LiveChargerStatus>, StatusError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let behaviour = self.behaviour.clone();

            async move {
                match behaviour {
                    Behaviour::Ok(records) => Ok(records),
                    Behaviour::Sequence(queue) => queue
                        .lock()
                        .unwrap()
                        .pop_front()
                        .expect("sequence exhausted"),
                    Behaviour::Gated(gate, result) => {
                        let _permit = gate.acquire().await.unwrap();
                        result
                    }
                    Behaviour::Hang => futures::future::pending().await,
                }
            }
            .boxed()
        }
    }

    fn cache_with(behaviour: Behaviour) -> (Arc<StatusCache>, Arc<AtomicUsize>) {
        let (source, calls) = FakeSource::new(behaviour);
        let cache = StatusCache::new(Arc::new(source), &StatusCacheConfig::default());
        (Arc::new(cache), calls)
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_reads_hit_cache() {
        let (cache, calls) = cache_with(Behaviour::Ok(vec![live("01", "2")]));
        let id = station("PW000001");

        let first = cache.get_status(&id).await.unwrap();
        let second = cache.get_status(&id).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_boundary_is_exclusive() {
        let (cache, calls) = cache_with(Behaviour::Ok(vec![live("01", "2")]));
        let id = station("PW000001");

        cache.get_status(&id).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // One millisecond under the TTL: still a hit.
        tokio::time::advance(Duration::from_millis(299_999)).await;
        cache.get_status(&id).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Past the TTL: miss, fresh lookup.
        tokio::time::advance(Duration::from_millis(2)).await;
        cache.get_status(&id).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refetch_replaces_entry_wholesale() {
        let queue = Arc::new(StdMutex::new(VecDeque::from([
            Ok(vec![live("01", "2"), live("02", "3")]),
            Ok(vec![live("01", "3")]),
        ])));
        let (cache, _calls) = cache_with(Behaviour::Sequence(queue));
        let id = station("PW000001");

        let first = cache.get_status(&id).await.unwrap();
        assert_eq!(first.len(), 2);

        tokio::time::advance(DEFAULT_TTL + Duration::from_millis(1)).await;

        // The old two-record entry is gone, not merged with the new one.
        let second = cache.get_status(&id).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].status_code, "3");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_lookup() {
        let gate = Arc::new(Semaphore::new(0));
        let (cache, calls) = cache_with(Behaviour::Gated(
            Arc::clone(&gate),
            Ok(vec![live("01", "2")]),
        ));
        let id = station("PW000001");

        let a = tokio::spawn({
            let cache = Arc::clone(&cache);
            let id = id.clone();
            async move { cache.get_status(&id).await }
        });
        let b = tokio::spawn({
            let cache = Arc::clone(&cache);
            let id = id.clone();
            async move { cache.get_status(&id).await }
        });

        // Let both callers reach the await point before releasing the gate.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        gate.add_permits(1);

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_fans_out_to_all_waiters() {
        let gate = Arc::new(Semaphore::new(0));
        let failure = StatusError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        let (cache, calls) = cache_with(Behaviour::Gated(
            Arc::clone(&gate),
            Err(failure.clone()),
        ));
        let id = station("PW000001");

        let a = tokio::spawn({
            let cache = Arc::clone(&cache);
            let id = id.clone();
            async move { cache.get_status(&id).await }
        });
        let b = tokio::spawn({
            let cache = Arc::clone(&cache);
            let id = id.clone();
            async move { cache.get_status(&id).await }
        });

        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        gate.add_permits(1);

        assert_eq!(a.await.unwrap().unwrap_err(), failure);
        assert_eq!(b.await.unwrap().unwrap_err(), failure);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The failure left nothing behind.
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_failure_starts_fresh_lookup() {
        let queue = Arc::new(StdMutex::new(VecDeque::from([
            Err(StatusError::Api {
                status: 500,
                message: "boom".into(),
            }),
            Ok(vec![live("01", "2")]),
        ])));
        let (cache, calls) = cache_with(Behaviour::Sequence(queue));
        let id = station("PW000001");

        assert!(cache.get_status(&id).await.is_err());
        assert_eq!(cache.entry_count().await, 0);

        // No stale in-flight or cache entry blocks the retry.
        let records = cache.get_status(&id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_caller_does_not_prevent_settlement() {
        let gate = Arc::new(Semaphore::new(0));
        let (cache, calls) = cache_with(Behaviour::Gated(
            Arc::clone(&gate),
            Ok(vec![live("01", "2")]),
        ));
        let id = station("PW000001");

        let caller = tokio::spawn({
            let cache = Arc::clone(&cache);
            let id = id.clone();
            async move { cache.get_status(&id).await }
        });

        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The only caller goes away mid-lookup.
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        // The lookup still settles and populates the cache.
        gate.add_permits(1);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(cache.entry_count().await, 1);

        // A later caller reads the settled result without a new fetch.
        let records = cache.get_status(&id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_timed_out_lookup_still_cleans_up() {
        let (cache, calls) = cache_with(Behaviour::Hang);
        let id = station("PW000001");

        let caller = tokio::spawn({
            let cache = Arc::clone(&cache);
            let id = id.clone();
            async move { cache.get_status(&id).await }
        });

        tokio::task::yield_now().await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        // Let the timeout fire with nobody waiting; the in-flight entry
        // is removed on settlement and nothing reaches the cache.
        tokio::time::advance(DEFAULT_FETCH_TIMEOUT + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(cache.entry_count().await, 0);

        // The next caller starts a fresh lookup, not a dormant one.
        let err = cache.get_status(&id).await.unwrap_err();
        assert_eq!(err, StatusError::Timeout);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_times_out_with_distinct_error() {
        let (cache, calls) = cache_with(Behaviour::Hang);
        let id = station("PW000001");

        let err = cache.get_status(&id).await.unwrap_err();
        assert_eq!(err, StatusError::Timeout);

        // The timed-out lookup was cleaned up; the next call starts anew.
        let err = cache.get_status(&id).await.unwrap_err();
        assert_eq!(err, StatusError::Timeout);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_stations_do_not_share_lookups() {
        let (cache, calls) = cache_with(Behaviour::Ok(vec![live("01", "2")]));

        cache.get_status(&station("PW000001")).await.unwrap();
        cache.get_status(&station("PW000002")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.entry_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_all_forces_refetch() {
        let (cache, calls) = cache_with(Behaviour::Ok(vec![live("01", "2")]));
        let id = station("PW000001");

        cache.get_status(&id).await.unwrap();
        cache.invalidate_all().await;
        assert_eq!(cache.entry_count().await, 0);

        cache.get_status(&id).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_config() {
        let config = StatusCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_millis(300_000));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }
}
