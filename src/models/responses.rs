//! Response DTOs for the observability API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::CacheMetrics;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Aggregate hit rate across every cache domain (0-100)
    pub cache_hit_rate: f64,
    /// Total live entries across every cache domain
    pub cached_entries: usize,
}

impl HealthResponse {
    /// Creates a healthy response from the aggregate cache metrics.
    pub fn healthy(aggregate: &CacheMetrics) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache_hit_rate: aggregate.hit_rate,
            cached_entries: aggregate.size,
        }
    }
}

/// Response body for the metrics endpoints (GET /metrics, /metrics/:domain)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    /// Per-domain metrics snapshots, keyed by domain name
    pub domains: BTreeMap<String, CacheMetrics>,
    /// Counters summed across domains, with a combined hit rate
    pub aggregate: CacheMetrics,
}

/// Request body for the invalidation endpoint (POST /invalidate)
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Glob-style key pattern, e.g. "channels:*"
    pub pattern: String,
}

impl InvalidateRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.trim().is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}

/// Response body for the invalidation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// The pattern that was applied
    pub pattern: String,
    /// Number of entries removed across all domains
    pub removed: usize,
}

/// Response body for the eager purge endpoint (POST /purge)
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Expired entries removed per domain
    pub removed: BTreeMap<String, usize>,
    /// Total expired entries removed
    pub total: usize,
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}
