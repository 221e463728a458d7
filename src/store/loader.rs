//! Store Loader
//!
//! Bridges the document store to the cache group's loader port.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::DocumentStore;
use crate::cache::Loader;
use crate::error::{CacheError, Result};

// == Store Loader ==
/// Loads a document by id and serializes it to the bytes the cache holds.
///
/// Cached values are the JSON encoding of the document, matching what the
/// document endpoint returns.
pub struct StoreLoader {
    store: Arc<dyn DocumentStore>,
}

impl StoreLoader {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Loader for StoreLoader {
    async fn fetch(&self, key: &str) -> Result<Bytes> {
        debug!(key, "loading document from store");
        match self.store.find_one(key).await? {
            Some(doc) => {
                let encoded = serde_json::to_vec(&doc)
                    .map_err(|e| CacheError::Internal(format!("encoding document: {}", e)))?;
                Ok(Bytes::from(encoded))
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }
}
