//! Cache Module
//!
//! The LRU cache engine: bounded in-memory storage with TTL expiration,
//! recency-based eviction, removal listeners and running metrics.

mod entry;
mod lru;
mod metrics;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyList;
pub use metrics::CacheMetrics;
pub use store::{CacheOptions, LruCache, RemovalCause, RemovalListener, SizeCalculator};
