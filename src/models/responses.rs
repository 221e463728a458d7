//! Response DTOs for the document API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{GroupStats, TierStats};

/// Response body for the stats endpoint (GET /stats)
///
/// Combines the group lookup counters with a snapshot of each tier.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Group-level counters (gets, hits, loads, peer traffic)
    pub group: GroupStats,
    /// Authoritative tier snapshot
    pub main_cache: TierStats,
    /// Remotely-owned tier snapshot
    pub hot_cache: TierStats,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_stats_response_serialize() {
        let resp = CacheStatsResponse {
            group: GroupStats::default(),
            main_cache: TierStats::default(),
            hot_cache: TierStats::default(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("main_cache"));
        assert!(json.contains("hot_cache"));
        assert!(json.contains("peer_requests_sent"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("something went wrong"));
    }
}
