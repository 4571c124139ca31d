//! Slackcache - caching and request infrastructure for a Slack workspace tool server
//!
//! Provides an LRU cache engine with TTL expiration, a cache-or-fetch
//! orchestration layer, a bounded concurrency runner and a cursor pagination
//! engine, plus an HTTP surface for health, metrics and invalidation.

pub mod api;
pub mod cache;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestration;
pub mod pagination;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_purge_task;
