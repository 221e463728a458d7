//! Request DTOs for the document API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for creating a document (POST /document)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    /// Document title
    pub title: String,
    /// Document body
    pub content: String,
}

impl CreateDocumentRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.title.is_empty() {
            return Some("Title cannot be empty".to_string());
        }
        if self.title.len() > 256 {
            return Some("Title exceeds maximum length of 256 characters".to_string());
        }
        None
    }
}
