//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// This process's peer-visible base URL
    pub self_addr: String,
    /// All peer base URLs, self included
    pub peers: Vec<String>,
    /// Main (authoritative) cache capacity in bytes
    pub main_cache_bytes: u64,
    /// Hot (remotely-owned) cache capacity in bytes
    pub hot_cache_bytes: u64,
    /// TTL attached to cache entries at insertion
    pub entry_ttl: Duration,
    /// Virtual replicas per peer on the hash ring
    pub ring_replicas: usize,
    /// Bounded wait for a backing-store load
    pub load_timeout: Duration,
    /// Bounded wait for an inter-peer fetch
    pub peer_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SELF_ADDR` - this peer's base URL (default: `http://localhost:8080`)
    /// - `CACHE_PEERS` - comma-separated peer base URLs (default: just self)
    /// - `MAIN_CACHE_BYTES` - main tier capacity (default: 8 MiB)
    /// - `HOT_CACHE_BYTES` - hot tier capacity (default: 1 MiB)
    /// - `CACHE_TTL_SECS` - entry TTL in seconds (default: 300)
    /// - `RING_REPLICAS` - virtual replicas per peer (default: 50)
    /// - `LOAD_TIMEOUT_SECS` - store load timeout (default: 5)
    /// - `PEER_TIMEOUT_SECS` - peer fetch timeout (default: 5)
    pub fn from_env() -> Self {
        let self_addr = env::var("SELF_ADDR")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        let self_addr = self_addr.trim_end_matches('/').to_string();
        let peers = parse_peers(
            &env::var("CACHE_PEERS").unwrap_or_default(),
            &self_addr,
        );

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            self_addr,
            peers,
            main_cache_bytes: env::var("MAIN_CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8 * 1024 * 1024),
            hot_cache_bytes: env::var("HOT_CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024 * 1024),
            entry_ttl: Duration::from_secs(
                env::var("CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            ),
            ring_replicas: env::var("RING_REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            load_timeout: Duration::from_secs(
                env::var("LOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            ),
            peer_timeout: Duration::from_secs(
                env::var("PEER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Splits a comma-separated peer list, normalizing trailing slashes.
/// The peer set must include this process, so `self_addr` is appended
/// when the list omits it.
fn parse_peers(raw: &str, self_addr: &str) -> Vec<String> {
    let mut peers: Vec<String> = raw
        .split(',')
        .map(|p| p.trim().trim_end_matches('/').to_string())
        .filter(|p| !p.is_empty())
        .collect();
    if !peers.iter().any(|p| p == self_addr) {
        peers.push(self_addr.to_string());
    }
    peers
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            self_addr: "http://localhost:8080".to_string(),
            peers: vec!["http://localhost:8080".to_string()],
            main_cache_bytes: 8 * 1024 * 1024,
            hot_cache_bytes: 1024 * 1024,
            entry_ttl: Duration::from_secs(300),
            ring_replicas: 50,
            load_timeout: Duration::from_secs(5),
            peer_timeout: Duration::from_secs(5),
        }
    }
}
