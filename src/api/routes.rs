//! API Routes
//!
//! Configures the Axum router with the observability endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    domain_metrics_handler, health_handler, invalidate_handler, metrics_handler, purge_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Service health plus aggregate cache status
/// - `GET /metrics` - Per-domain metrics and the combined aggregate
/// - `GET /metrics/:domain` - One domain's metrics snapshot
/// - `POST /invalidate` - Remove entries matching a glob pattern
/// - `POST /purge` - Eagerly sweep expired entries
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/metrics/:domain", get(domain_metrics_handler))
        .route("/invalidate", post(invalidate_handler))
        .route("/purge", post(purge_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
