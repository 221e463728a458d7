//! Cache Module
//!
//! The caching core: consistent-hash peer routing, tiered byte-bounded LRU
//! caches with lazy TTL expiry, singleflight load deduplication, and stats.

mod entry;
mod group;
mod lru;
mod ring;
mod singleflight;
mod stats;
mod tier;


// Re-export public types
pub use entry::CacheEntry;
pub use group::{CacheGroup, Loader};
pub use lru::LruTracker;
pub use ring::HashRing;
pub use singleflight::SingleFlight;
pub use stats::{GroupCounters, GroupStats, TierStats};
pub use tier::TierCache;
