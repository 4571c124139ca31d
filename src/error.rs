//! Error types for the cache infrastructure
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Infra Error Enum ==
/// Unified error type for the cache infrastructure and its HTTP surface.
#[derive(Error, Debug)]
pub enum InfraError {
    /// Invalid cache or runner configuration, rejected at construction time
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Unknown cache domain referenced by a caller
    #[error("Unknown cache domain: {0}")]
    UnknownDomain(String),

    /// Invalid request data on the HTTP surface
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream fetch failed during a cache-miss compute or paginated walk
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for InfraError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            InfraError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            InfraError::UnknownDomain(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            InfraError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            InfraError::Upstream(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache infrastructure.
pub type Result<T> = std::result::Result<T, InfraError>;
