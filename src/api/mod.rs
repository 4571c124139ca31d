//! API Module
//!
//! HTTP observability surface over the cache orchestrator.

mod handlers;
mod routes;

pub use handlers::AppState;
pub use routes::create_router;
