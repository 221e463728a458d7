//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_document_handler, get_document_handler, health_handler, list_documents_handler,
    peer_fetch_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /stats` - Cache statistics snapshot
/// - `POST /document` - Create a document (bypasses the cache)
/// - `GET /document/:id` - Read a document through the cache
/// - `GET /documents` - List all documents (bypasses the cache)
/// - `GET /_internal/cache/:group/:key` - Inter-peer fetch protocol
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/document", post(create_document_handler))
        .route("/document/:id", get(get_document_handler))
        .route("/documents", get(list_documents_handler))
        .route("/_internal/cache/:group/:key", get(peer_fetch_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
