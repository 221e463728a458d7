//! In-Memory Document Store
//!
//! HashMap-backed implementation of the store port.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::error::Result;
use crate::models::Document;

// == Memory Store ==
/// Thread-safe in-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Document>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, doc: Document) -> Result<Document> {
        let mut docs = self.docs.write().await;
        docs.insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    async fn find_one(&self, id: &str) -> Result<Option<Document>> {
        let docs = self.docs.read().await;
        Ok(docs.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Document>> {
        let docs = self.docs.read().await;
        let mut all: Vec<Document> = docs.values().cloned().collect();
        // Stable listing order for clients and tests
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}
