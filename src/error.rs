//! Error types for the document cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and the HTTP surface.
///
/// Cloneable because singleflight broadcasts one result to every waiter.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Key absent from the backing store; never cached, never retried
    #[error("key not found: {0}")]
    NotFound(String),

    /// Backing store or peer call failed
    #[error("load failed: {0}")]
    Load(String),

    /// Bounded wait exceeded on a loader or peer call
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Caller's context ended before the load completed
    #[error("load cancelled for key: {0}")]
    Cancelled(String),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Load(_) => StatusCode::BAD_GATEWAY,
            CacheError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Cancelled(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
