//! Data Models
//!
//! Documents and the request/response DTOs for the HTTP API.

mod document;
mod requests;
mod responses;

pub use document::Document;
pub use requests::CreateDocumentRequest;
pub use responses::{CacheStatsResponse, ErrorResponse, HealthResponse};
