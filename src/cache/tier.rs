//! Cache Tier Module
//!
//! Byte-bounded LRU store used for both the main and hot tiers.

use std::collections::HashMap;

use crate::cache::{CacheEntry, LruTracker, TierStats};

/// Bytes an entry is charged for: its key plus its value.
fn charge(key: &str, entry: &CacheEntry) -> u64 {
    (key.len() + entry.value.len()) as u64
}

// == Tier Cache ==
/// One cache tier: a key-value map bounded by total bytes, with LRU
/// eviction and lazy TTL expiry.
///
/// Invariant: `used_bytes <= capacity_bytes` after every operation. An
/// entry larger than the whole tier is refused rather than inserted.
#[derive(Debug)]
pub struct TierCache {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Tier counters
    stats: TierStats,
    /// Maximum total bytes (keys + values)
    capacity_bytes: u64,
    /// Bytes currently charged
    used_bytes: u64,
}

impl TierCache {
    /// Creates an empty tier with the given byte capacity.
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: TierStats::new(),
            capacity_bytes,
            used_bytes: 0,
        }
    }

    // == Put ==
    /// Inserts an entry, replacing any existing entry for the key.
    ///
    /// Least-recently-used entries are evicted from the tail until the new
    /// entry fits; the new entry lands at the recency head. Returns false
    /// when the entry alone exceeds the tier capacity and was not stored.
    pub fn put(&mut self, key: String, entry: CacheEntry) -> bool {
        // Replace atomically: drop the old entry's charge first.
        if let Some(old) = self.entries.remove(&key) {
            self.used_bytes -= charge(&key, &old);
            self.lru.remove(&key);
        }

        let needed = charge(&key, &entry);
        if needed > self.capacity_bytes {
            self.stats.items = self.entries.len();
            self.stats.bytes = self.used_bytes;
            return false;
        }

        while self.used_bytes + needed > self.capacity_bytes {
            match self.lru.evict_oldest() {
                Some(victim) => {
                    if let Some(evicted) = self.entries.remove(&victim) {
                        self.used_bytes -= charge(&victim, &evicted);
                        self.stats.record_eviction();
                    }
                }
                None => break,
            }
        }

        self.used_bytes += needed;
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.items = self.entries.len();
        self.stats.bytes = self.used_bytes;
        true
    }

    // == Get ==
    /// Looks up a key, refreshing its recency on a hit.
    ///
    /// An expired entry is removed on the spot and reported as a miss;
    /// expiries are counted separately from capacity evictions.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        self.stats.record_get();

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return None,
        };

        if expired {
            if let Some(old) = self.entries.remove(key) {
                self.used_bytes -= charge(key, &old);
            }
            self.lru.remove(key);
            self.stats.record_expiration();
            self.stats.items = self.entries.len();
            self.stats.bytes = self.used_bytes;
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).cloned()
    }

    // == Contains ==
    /// Checks for a live (unexpired) entry without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|e| !e.is_expired())
            .unwrap_or(false)
    }

    // == Stats ==
    /// Returns a snapshot of the tier counters.
    pub fn stats(&self) -> TierStats {
        let mut stats = self.stats.clone();
        stats.items = self.entries.len();
        stats.bytes = self.used_bytes;
        stats
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently charged against capacity.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }
}
