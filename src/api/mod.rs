//! API Module
//!
//! HTTP surface: router, handlers and fault injection.

pub mod chaos;
mod handlers;
mod routes;

pub use handlers::AppState;
pub use routes::create_router;
