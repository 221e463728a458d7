//! Document Model
//!
//! The stored record served through the cache.

use serde::{Deserialize, Serialize};

/// A document in the backing store.
///
/// The id doubles as the cache key; cached values are the JSON encoding of
/// this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: String,
    /// Document title
    pub title: String,
    /// Document body
    pub content: String,
}

impl Document {
    /// Creates a document with a fresh v4 UUID id.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
        }
    }
}
