//! Cache Group Module
//!
//! Orchestrates lookups across the hot and main tiers, consistent-hash
//! ownership, singleflight local loads and inter-peer fetches.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::debug;

use crate::cache::{
    CacheEntry, GroupCounters, GroupStats, HashRing, SingleFlight, TierCache, TierStats,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Loader Port ==
/// Fetches a value from the backing store when this process owns the key.
///
/// Injected at group construction so tests can substitute a double.
/// Must be idempotent; it is invoked once per singleflight miss.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Bytes>;
}

// == Cache Group ==
/// A named, distributed read-through cache.
///
/// Lookup order: hot tier, main tier, then the ring decides. Keys this
/// process owns are loaded from the store through singleflight and land in
/// the main tier; remotely-owned keys are fetched from the owning peer and
/// land in the hot tier so skewed access patterns stop paying the network
/// hop. Negative results are never cached.
pub struct CacheGroup {
    /// Group name, part of the peer protocol path
    name: String,
    /// This process's ring identity
    self_addr: String,
    /// Key -> owning peer
    ring: HashRing,
    /// Authoritative tier (locally loaded values)
    main: RwLock<TierCache>,
    /// Remotely-owned tier
    hot: RwLock<TierCache>,
    /// Per-key load deduplication
    flight: SingleFlight,
    /// Backing-store fetch port
    loader: Arc<dyn Loader>,
    /// HTTP client for inter-peer fetches
    peer_client: reqwest::Client,
    /// Lookup-path counters
    counters: GroupCounters,
    /// TTL attached to every inserted entry
    entry_ttl: Duration,
    /// Bounded wait on the loader
    load_timeout: Duration,
    /// Bounded wait on a peer fetch
    peer_timeout: Duration,
}

impl CacheGroup {
    /// Creates a group from configuration with an injected loader.
    pub fn new(name: impl Into<String>, config: &Config, loader: Arc<dyn Loader>) -> Self {
        Self {
            name: name.into(),
            self_addr: config.self_addr.clone(),
            ring: HashRing::new(&config.peers, config.ring_replicas),
            main: RwLock::new(TierCache::new(config.main_cache_bytes)),
            hot: RwLock::new(TierCache::new(config.hot_cache_bytes)),
            flight: SingleFlight::new(),
            loader,
            peer_client: reqwest::Client::new(),
            counters: GroupCounters::new(),
            entry_ttl: config.entry_ttl,
            load_timeout: config.load_timeout,
            peer_timeout: config.peer_timeout,
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Looks up a key, loading it through the owner on a total miss.
    ///
    /// Owner == self goes to the backing store; a remote owner gets one
    /// bounded HTTP fetch. A peer failure is surfaced as-is: falling back
    /// to a local load would break single-owner semantics.
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        self.counters.gets.fetch_add(1, Ordering::Relaxed);

        // Tier lookups take the write lock: a hit refreshes recency.
        if let Some(entry) = self.hot.write().await.get(key) {
            self.counters.hot_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.value);
        }
        if let Some(entry) = self.main.write().await.get(key) {
            self.counters.main_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.value);
        }

        let owner = self
            .ring
            .owner(key)
            .ok_or_else(|| CacheError::Internal("peer ring is empty".to_string()))?
            .to_string();

        if owner == self.self_addr {
            self.flight.load(key, || self.load_local(key)).await
        } else {
            self.flight
                .load(key, || self.fetch_from_peer(owner, key))
                .await
        }
    }

    // == Serve Peer ==
    /// Handles an inbound fetch from another peer.
    ///
    /// Main tier then local load only; never consults the ring again, so a
    /// request cannot hop more than once even if the peers' ring views
    /// disagree.
    pub async fn serve_peer(&self, key: &str) -> Result<Bytes> {
        self.counters
            .peer_requests_served
            .fetch_add(1, Ordering::Relaxed);

        if let Some(entry) = self.main.write().await.get(key) {
            self.counters.main_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.value);
        }
        self.flight.load(key, || self.load_local(key)).await
    }

    // == Local Load ==
    /// Runs the injected loader with a bounded wait and fills the main tier.
    ///
    /// Runs inside singleflight, so the fetch and the insertion happen once
    /// per in-flight key no matter how many callers wait on it.
    async fn load_local(&self, key: &str) -> Result<Bytes> {
        self.counters.loads.fetch_add(1, Ordering::Relaxed);

        let fetched = match timeout(self.load_timeout, self.loader.fetch(key)).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                self.counters.load_errors.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
            Err(_) => {
                self.counters.load_errors.fetch_add(1, Ordering::Relaxed);
                return Err(CacheError::Timeout(self.load_timeout));
            }
        };

        let entry = CacheEntry::with_ttl(fetched.clone(), self.entry_ttl);
        self.main.write().await.put(key.to_string(), entry);
        debug!(key, "loaded into main cache");
        Ok(fetched)
    }

    // == Peer Fetch ==
    /// Fetches a remotely-owned key from its owner and fills the hot tier.
    async fn fetch_from_peer(&self, owner: String, key: &str) -> Result<Bytes> {
        self.counters
            .peer_requests_sent
            .fetch_add(1, Ordering::Relaxed);

        let url = format!("{}/_internal/cache/{}/{}", owner, self.name, key);
        debug!(%url, "fetching from owning peer");

        let response = self
            .peer_client
            .get(&url)
            .timeout(self.peer_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CacheError::Timeout(self.peer_timeout)
                } else {
                    CacheError::Load(format!("peer {} unreachable: {}", owner, e))
                }
            })?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(CacheError::NotFound(key.to_string())),
            status => {
                return Err(CacheError::Load(format!(
                    "peer {} returned {}",
                    owner, status
                )))
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::Load(format!("reading peer response: {}", e)))?;

        let entry = CacheEntry::with_ttl(body.clone(), self.entry_ttl);
        self.hot.write().await.put(key.to_string(), entry);
        debug!(key, "stored peer value in hot cache");
        Ok(body)
    }

    // == Stats ==
    /// Snapshot of the group lookup counters.
    pub fn group_stats(&self) -> GroupStats {
        self.counters.snapshot()
    }

    /// Snapshot of the main tier.
    pub async fn main_stats(&self) -> TierStats {
        self.main.read().await.stats()
    }

    /// Snapshot of the hot tier.
    pub async fn hot_stats(&self) -> TierStats {
        self.hot.read().await.stats()
    }

    /// Whether the main tier holds a live entry for `key` (no recency touch).
    pub async fn main_contains(&self, key: &str) -> bool {
        self.main.read().await.contains(key)
    }

    /// Whether the hot tier holds a live entry for `key` (no recency touch).
    pub async fn hot_contains(&self, key: &str) -> bool {
        self.hot.read().await.contains(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    /// Test double for the loader port: serves a fixed key set, counts
    /// fetches, optionally sleeps.
    struct FakeLoader {
        values: HashMap<String, Bytes>,
        fetches: AtomicUsize,
        delay: Duration,
    }

    impl FakeLoader {
        fn with_doc(key: &str, value: &'static str) -> Self {
            let mut values = HashMap::new();
            values.insert(key.to_string(), Bytes::from_static(value.as_bytes()));
            Self {
                values,
                fetches: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn empty() -> Self {
            Self {
                values: HashMap::new(),
                fetches: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Loader for FakeLoader {
        async fn fetch(&self, key: &str) -> Result<Bytes> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.values
                .get(key)
                .cloned()
                .ok_or_else(|| CacheError::NotFound(key.to_string()))
        }
    }

    /// Single-peer config: every key is locally owned.
    fn local_config() -> Config {
        Config::default()
    }

    #[tokio::test]
    async fn test_get_loads_once_then_hits_main() {
        let loader = Arc::new(FakeLoader::with_doc("doc-1", "payload"));
        let group = CacheGroup::new("documents", &local_config(), loader.clone());

        let first = group.get("doc-1").await.unwrap();
        assert_eq!(first, Bytes::from_static(b"payload"));
        assert_eq!(loader.fetch_count(), 1);
        assert!(group.main_contains("doc-1").await);

        let second = group.get("doc-1").await.unwrap();
        assert_eq!(second, first);
        // Served from the main tier, no further load
        assert_eq!(loader.fetch_count(), 1);

        let stats = group.group_stats();
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.main_hits, 1);
        assert_eq!(stats.hot_hits, 0);
        assert_eq!(stats.loads, 1);
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_load() {
        let loader = Arc::new(
            FakeLoader::with_doc("doc-1", "payload").slow(Duration::from_millis(50)),
        );
        let group = Arc::new(CacheGroup::new("documents", &local_config(), loader.clone()));

        let mut handles = vec![];
        for _ in 0..25 {
            let group = Arc::clone(&group);
            handles.push(tokio::spawn(async move { group.get("doc-1").await }));
        }

        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert_eq!(value, Bytes::from_static(b"payload"));
        }
        assert_eq!(loader.fetch_count(), 1);
        assert_eq!(group.group_stats().loads, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry_triggers_one_reload() {
        let mut config = local_config();
        config.entry_ttl = Duration::from_millis(50);

        let loader = Arc::new(FakeLoader::with_doc("doc-1", "payload"));
        let group = CacheGroup::new("documents", &config, loader.clone());

        group.get("doc-1").await.unwrap();
        assert_eq!(loader.fetch_count(), 1);

        tokio::time::sleep(Duration::from_millis(80)).await;

        group.get("doc-1").await.unwrap();
        assert_eq!(loader.fetch_count(), 2);
        assert_eq!(group.main_stats().await.expirations, 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let loader = Arc::new(FakeLoader::empty());
        let group = CacheGroup::new("documents", &local_config(), loader.clone());

        let first = group.get("ghost").await;
        assert!(matches!(first, Err(CacheError::NotFound(_))));

        let second = group.get("ghost").await;
        assert!(matches!(second, Err(CacheError::NotFound(_))));

        // Negative results hit the loader every time
        assert_eq!(loader.fetch_count(), 2);
        let stats = group.group_stats();
        assert_eq!(stats.loads, 2);
        assert_eq!(stats.load_errors, 2);
        assert!(!group.main_contains("ghost").await);
    }

    #[tokio::test]
    async fn test_slow_loader_times_out() {
        let mut config = local_config();
        config.load_timeout = Duration::from_millis(30);

        let loader =
            Arc::new(FakeLoader::with_doc("doc-1", "payload").slow(Duration::from_millis(200)));
        let group = CacheGroup::new("documents", &config, loader);

        let result = group.get("doc-1").await;
        assert!(matches!(result, Err(CacheError::Timeout(_))));
        assert_eq!(group.group_stats().load_errors, 1);
        assert!(!group.main_contains("doc-1").await);
    }

    #[tokio::test]
    async fn test_serve_peer_loads_and_counts() {
        let loader = Arc::new(FakeLoader::with_doc("doc-1", "payload"));
        let group = CacheGroup::new("documents", &local_config(), loader.clone());

        let value = group.serve_peer("doc-1").await.unwrap();
        assert_eq!(value, Bytes::from_static(b"payload"));
        assert!(group.main_contains("doc-1").await);

        // Second peer request is a main-tier hit
        group.serve_peer("doc-1").await.unwrap();
        assert_eq!(loader.fetch_count(), 1);

        let stats = group.group_stats();
        assert_eq!(stats.peer_requests_served, 2);
    }

    #[tokio::test]
    async fn test_unreachable_owner_is_hard_failure() {
        // Two peers; find a key the remote (unroutable) peer owns.
        let remote = "http://127.0.0.1:1".to_string();
        let mut config = local_config();
        config.peers = vec![config.self_addr.clone(), remote.clone()];
        config.peer_timeout = Duration::from_millis(500);

        let ring = HashRing::new(&config.peers, config.ring_replicas);
        let key = (0..10_000)
            .map(|i| format!("doc-{}", i))
            .find(|k| ring.owner(k) == Some(remote.as_str()))
            .expect("some key must hash to the remote peer");

        let loader = Arc::new(FakeLoader::empty());
        let group = CacheGroup::new("documents", &config, loader.clone());

        let result = group.get(&key).await;
        assert!(matches!(
            result,
            Err(CacheError::Load(_)) | Err(CacheError::Timeout(_))
        ));

        // No silent fallback to a wrong-owner local load
        assert_eq!(loader.fetch_count(), 0);
        assert_eq!(group.group_stats().loads, 0);
        assert_eq!(group.group_stats().peer_requests_sent, 1);
        assert!(!group.hot_contains(&key).await);
        assert!(!group.main_contains(&key).await);
    }
}
