//! Orchestration Module
//!
//! The cache orchestration layer: deterministic key building, typed
//! per-domain cache handles with single-flight cache-or-fetch, the two-tier
//! search cache, and coordinated invalidation plus metrics aggregation.

pub mod keys;
mod manager;
mod search;

pub use keys::{build_key, canonical_params, pattern_matches};
pub use manager::{combine_metrics, CacheOrchestrator, DomainCache};
pub use search::{normalize_query, SearchCache, Volatility};
