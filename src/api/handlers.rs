//! API Handlers
//!
//! HTTP request handlers for the document and cache endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::api::chaos::{apply_latency, injected_failure, FaultParams};
use crate::cache::CacheGroup;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{CacheStatsResponse, CreateDocumentRequest, Document, HealthResponse};
use crate::store::{DocumentStore, MemoryStore, StoreLoader};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The distributed cache group serving document reads
    pub group: Arc<CacheGroup>,
    /// The backing document store (writes and cache-bypassing reads)
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Creates a new AppState from existing parts.
    pub fn new(group: Arc<CacheGroup>, store: Arc<dyn DocumentStore>) -> Self {
        Self { group, store }
    }

    /// Wires the default topology from configuration: an in-memory store
    /// behind the loader, one cache group named "documents".
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let loader = Arc::new(StoreLoader::new(Arc::clone(&store)));
        let group = Arc::new(CacheGroup::new("documents", config, loader));
        Self::new(group, store)
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
///
/// Returns the group counters and a snapshot of both tiers.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        group: state.group.group_stats(),
        main_cache: state.group.main_stats().await,
        hot_cache: state.group.hot_stats().await,
    })
}

/// Handler for POST /document
///
/// Writes bypass the cache entirely; a stale cached read for this id
/// persists until its TTL elapses.
pub async fn create_document_handler(
    State(state): State<AppState>,
    Query(faults): Query<FaultParams>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<Response> {
    apply_latency(&faults).await;
    if let Some(failure) = injected_failure(&faults) {
        return Ok(failure);
    }

    if let Some(message) = req.validate() {
        return Err(CacheError::InvalidRequest(message));
    }

    let doc = state
        .store
        .insert(Document::new(req.title, req.content))
        .await?;
    info!(id = %doc.id, "document created");
    Ok(Json(doc).into_response())
}

/// Handler for GET /document/:id
///
/// Served through the cache group; the body is the cached JSON encoding of
/// the document.
pub async fn get_document_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(faults): Query<FaultParams>,
) -> Result<Response> {
    apply_latency(&faults).await;
    if let Some(failure) = injected_failure(&faults) {
        return Ok(failure);
    }

    let value = state.group.get(&id).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], value).into_response())
}

/// Handler for GET /documents
///
/// Reads the store directly, bypassing the cache.
pub async fn list_documents_handler(
    State(state): State<AppState>,
    Query(faults): Query<FaultParams>,
) -> Result<Response> {
    apply_latency(&faults).await;
    if let Some(failure) = injected_failure(&faults) {
        return Ok(failure);
    }

    let docs = state.store.find_all().await?;
    Ok(Json(docs).into_response())
}

/// Handler for GET /_internal/cache/:group/:key
///
/// The inter-peer fetch protocol: serves raw value bytes from this peer's
/// main cache or loader. Never forwarded onward (single hop).
pub async fn peer_fetch_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Result<Response> {
    if group != state.group.name() {
        return Err(CacheError::NotFound(format!("no such group: {}", group)));
    }

    let value = state.group.serve_peer(&key).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value,
    )
        .into_response())
}
