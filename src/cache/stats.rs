//! Cache Statistics Module
//!
//! Counters for the cache tiers and the group lookup path.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Tier Stats ==
/// Point-in-time counters for one cache tier.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TierStats {
    /// Entries currently held
    pub items: usize,
    /// Bytes currently held (keys + values)
    pub bytes: u64,
    /// Lookup attempts
    pub gets: u64,
    /// Lookups that returned a live entry
    pub hits: u64,
    /// Entries removed under capacity pressure
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

impl TierStats {
    /// Creates a new TierStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_get(&mut self) {
        self.gets += 1;
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Group Counters ==
/// Live counters for the group lookup path.
///
/// Incremented outside the tier locks, so these are atomics; reads are
/// eventually-consistent snapshots rather than transactional.
#[derive(Debug, Default)]
pub struct GroupCounters {
    /// Total `get` calls on the group
    pub gets: AtomicU64,
    /// Hits served from the main tier
    pub main_hits: AtomicU64,
    /// Hits served from the hot tier
    pub hot_hits: AtomicU64,
    /// Backing-store fetches actually executed
    pub loads: AtomicU64,
    /// Backing-store fetches that failed (including timeouts)
    pub load_errors: AtomicU64,
    /// Outbound fetches to owning peers
    pub peer_requests_sent: AtomicU64,
    /// Inbound fetches served for other peers
    pub peer_requests_served: AtomicU64,
}

impl GroupCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a serializable snapshot of the counters.
    pub fn snapshot(&self) -> GroupStats {
        GroupStats {
            gets: self.gets.load(Ordering::Relaxed),
            main_hits: self.main_hits.load(Ordering::Relaxed),
            hot_hits: self.hot_hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_errors: self.load_errors.load(Ordering::Relaxed),
            peer_requests_sent: self.peer_requests_sent.load(Ordering::Relaxed),
            peer_requests_served: self.peer_requests_served.load(Ordering::Relaxed),
        }
    }
}

// == Group Stats ==
/// Snapshot of [`GroupCounters`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupStats {
    pub gets: u64,
    pub main_hits: u64,
    pub hot_hits: u64,
    pub loads: u64,
    pub load_errors: u64,
    pub peer_requests_sent: u64,
    pub peer_requests_served: u64,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_stats_start_at_zero() {
        let stats = TierStats::new();
        assert_eq!(stats.gets, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 0);
    }

    #[test]
    fn test_tier_stats_record() {
        let mut stats = TierStats::new();
        stats.record_get();
        stats.record_get();
        stats.record_hit();
        stats.record_eviction();
        stats.record_expiration();

        assert_eq!(stats.gets, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_group_counters_snapshot() {
        let counters = GroupCounters::new();
        counters.gets.fetch_add(3, Ordering::Relaxed);
        counters.main_hits.fetch_add(1, Ordering::Relaxed);
        counters.loads.fetch_add(2, Ordering::Relaxed);

        let snap = counters.snapshot();
        assert_eq!(snap.gets, 3);
        assert_eq!(snap.main_hits, 1);
        assert_eq!(snap.hot_hits, 0);
        assert_eq!(snap.loads, 2);
    }

    #[test]
    fn test_group_stats_serialize() {
        let snap = GroupCounters::new().snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("peer_requests_sent"));
        assert!(json.contains("loads"));
    }
}
