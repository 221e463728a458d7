//! doccache - A distributed read-through document cache
//!
//! Serves document lookups through a two-tier LRU cache with TTL expiry,
//! routing each key to its owning peer via consistent hashing and
//! deduplicating concurrent loads per key.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use config::Config;
