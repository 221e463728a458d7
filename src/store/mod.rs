//! Document Store
//!
//! Port for the backing document store plus the in-memory implementation
//! and the cache loader that bridges the two.

mod loader;
mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Document;

pub use loader::StoreLoader;
pub use memory::MemoryStore;

// == Document Store Port ==
/// Backing store for documents.
///
/// The cache treats the store as an external collaborator behind this
/// trait, so tests can substitute a double and the production binary can
/// swap implementations without touching the cache core.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a document, returning it as stored.
    async fn insert(&self, doc: Document) -> Result<Document>;

    /// Fetches one document by id, or None when absent.
    async fn find_one(&self, id: &str) -> Result<Option<Document>>;

    /// Lists every stored document.
    async fn find_all(&self) -> Result<Vec<Document>>;
}
