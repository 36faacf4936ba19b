use arc_swap::ArcSwap;
use ipnetwork::IpNetwork;
use rustc_hash::FxHashSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Immutable snapshot of the Block Cache. Replaced wholesale via
/// `ArcSwap<BlockCacheSnapshot>` on refresh — readers never block behind a
/// writer mid-swap.
struct BlockCacheSnapshot {
    ips: FxHashSet<IpAddr>,
    networks: Vec<IpNetwork>,
    updated_at: Instant,
}

impl BlockCacheSnapshot {
    fn empty() -> Self {
        Self {
            ips: FxHashSet::default(),
            networks: Vec::new(),
            updated_at: Instant::now() - Duration::from_secs(3600),
        }
    }

    fn contains(&self, ip: IpAddr) -> bool {
        self.ips.contains(&ip) || self.networks.iter().any(|net| net.contains(ip))
    }
}

/// In-memory projection of effective `ip`/`range` firewall entries, refreshed
/// on a TTL (default 10s per the spec). A double-checked lock guards against
/// a thundering herd of concurrent refreshes when many readers observe a
/// stale cache at once.
pub struct BlockCache {
    snapshot: ArcSwap<BlockCacheSnapshot>,
    refreshing: Mutex<()>,
    ttl: Duration,
}

impl BlockCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(BlockCacheSnapshot::empty()),
            refreshing: Mutex::new(()),
            ttl,
        }
    }

    fn is_stale(&self) -> bool {
        self.snapshot.load().updated_at.elapsed() > self.ttl
    }

    /// Membership test. `refresh` is invoked to rebuild the snapshot only
    /// when the cache is stale; a second caller arriving while a refresh is
    /// already underway waits on the same lock and then re-reads the fresh
    /// snapshot rather than refreshing again.
    pub async fn is_blocked<F, Fut>(&self, ip: IpAddr, refresh: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = (FxHashSet<IpAddr>, Vec<IpNetwork>)>,
    {
        if self.is_stale() {
            let _guard = self.refreshing.lock().await;
            if self.is_stale() {
                let (ips, networks) = refresh().await;
                self.snapshot.store(Arc::new(BlockCacheSnapshot {
                    ips,
                    networks,
                    updated_at: Instant::now(),
                }));
            }
        }
        self.snapshot.load().contains(ip)
    }
}

/// Parses effective `ip`/`range` rows into the cache's internal shape.
/// Unparseable rows are skipped with a warning rather than failing the
/// whole refresh.
pub fn parse_rows(
    ip_values: impl Iterator<Item = String>,
    range_values: impl Iterator<Item = String>,
) -> (FxHashSet<IpAddr>, Vec<IpNetwork>) {
    let mut ips = FxHashSet::default();
    for v in ip_values {
        match v.parse::<IpAddr>() {
            Ok(ip) => {
                ips.insert(ip);
            }
            Err(e) => warn!(value = %v, error = %e, "skipping unparseable ip entry in block cache refresh"),
        }
    }
    let mut networks = Vec::new();
    for v in range_values {
        match v.parse::<IpNetwork>() {
            Ok(net) => networks.push(net),
            Err(e) => warn!(value = %v, error = %e, "skipping unparseable range entry in block cache refresh"),
        }
    }
    (ips, networks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refreshes_once_when_stale() {
        let cache = BlockCache::new(Duration::from_millis(10));
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let ip: IpAddr = "1.2.3.4".parse().unwrap();

        let blocked = cache
            .is_blocked(ip, || async {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                let mut ips = FxHashSet::default();
                ips.insert(ip);
                (ips, Vec::new())
            })
            .await;
        assert!(blocked);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn matches_cidr_ranges() {
        let cache = BlockCache::new(Duration::from_secs(60));
        let net: IpNetwork = "10.0.0.0/8".parse().unwrap();
        let blocked = cache
            .is_blocked("10.1.2.3".parse().unwrap(), || async move {
                (FxHashSet::default(), vec![net])
            })
            .await;
        assert!(blocked);
    }

    #[tokio::test]
    async fn does_not_refresh_again_within_ttl() {
        let cache = BlockCache::new(Duration::from_secs(60));
        let calls = std::sync::atomic::AtomicUsize::new(0);
        for _ in 0..5 {
            cache
                .is_blocked("9.9.9.9".parse().unwrap(), || async {
                    calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    (FxHashSet::default(), Vec::new())
                })
                .await;
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
