//! API Handlers
//!
//! HTTP request handlers for the observability endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheMetrics;
use crate::config::Config;
use crate::error::{InfraError, Result};
use crate::models::{
    HealthResponse, InvalidateRequest, InvalidateResponse, MetricsResponse, PurgeResponse,
};
use crate::orchestration::CacheOrchestrator;

/// Application state shared across all handlers.
///
/// The composition root: wires the configuration into the orchestrator and
/// hands the bundle to the router.
#[derive(Clone)]
pub struct AppState {
    /// The cache orchestration layer owning every domain cache
    pub orchestrator: Arc<CacheOrchestrator>,
}

impl AppState {
    /// Creates a new AppState over an existing orchestrator.
    pub fn new(orchestrator: CacheOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Builds the orchestrator from configuration.
    ///
    /// Fails fast on invalid cache settings rather than serving with a
    /// partially constructed state.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(CacheOrchestrator::new(config)?))
    }
}

/// Handler for GET /health
///
/// Reports service health alongside aggregate cache status.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let aggregate = state.orchestrator.aggregate_metrics().await;
    Json(HealthResponse::healthy(&aggregate))
}

/// Handler for GET /metrics
///
/// Returns per-domain metrics plus the combined aggregate.
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsResponse> {
    let domains = state.orchestrator.domain_metrics().await;
    let aggregate = state.orchestrator.aggregate_metrics().await;
    Json(MetricsResponse { domains, aggregate })
}

/// Handler for GET /metrics/:domain
///
/// Returns one domain's metrics snapshot.
pub async fn domain_metrics_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<CacheMetrics>> {
    let mut domains = state.orchestrator.domain_metrics().await;
    domains
        .remove(&domain)
        .map(Json)
        .ok_or(InfraError::UnknownDomain(domain))
}

/// Handler for POST /invalidate
///
/// Removes every cached entry matching the request's glob pattern.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(InfraError::InvalidRequest(error_msg));
    }

    let removed = state.orchestrator.invalidate(&req.pattern).await;

    Ok(Json(InvalidateResponse {
        pattern: req.pattern,
        removed,
    }))
}

/// Handler for POST /purge
///
/// Eagerly sweeps expired entries in every domain.
pub async fn purge_handler(State(state): State<AppState>) -> Json<PurgeResponse> {
    let removed = state.orchestrator.purge_stale().await;
    let total = removed.values().sum();
    Json(PurgeResponse { removed, total })
}
