//! Two-Tier Search Cache
//!
//! Search caching splits "is this exact query known" from "is the underlying
//! data still fresh": a query tier maps a normalized query string to a
//! result-set key, and a result tier maps that key to the payload. Result
//! keys embed the channels a result set touches, so one pattern sweep
//! invalidates every query referencing a stale channel without enumerating
//! query strings.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::{CacheMetrics, CacheOptions, LruCache};
use crate::config::SearchSettings;
use crate::error::Result;
use crate::models::SearchResults;
use crate::orchestration::keys::pattern_matches;

// == Volatility ==
/// How likely a result set is to change, driving adaptive TTL selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volatility {
    /// Historical or closed data; gets the long TTL
    Stable,
    /// Recent or active data; gets the short TTL
    Volatile,
}

// == Search Cache ==
/// The search domain's paired query and result caches.
pub struct SearchCache {
    /// normalized query -> result-set key
    queries: Arc<RwLock<LruCache<String>>>,
    /// result-set key -> payload
    results: Arc<RwLock<LruCache<SearchResults>>>,
    settings: SearchSettings,
}

impl SearchCache {
    // == Constructor ==
    /// Builds both tiers from the search settings.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let queries = LruCache::new(
            CacheOptions::new(settings.max_queries).with_ttl(settings.query_ttl),
        )?;
        let results = LruCache::new(
            CacheOptions::new(settings.max_results).with_ttl(settings.result_ttl),
        )?;

        Ok(Self {
            queries: Arc::new(RwLock::new(queries)),
            results: Arc::new(RwLock::new(results)),
            settings: settings.clone(),
        })
    }

    // == Cache Results ==
    /// Stores a search payload under both tiers.
    ///
    /// `channels` names the channels the result set touches; they become
    /// part of the result key so channel-scoped invalidation can find it.
    /// With adaptive TTL enabled, volatile results get the short TTL.
    pub async fn cache_results(
        &self,
        query: &str,
        channels: &[String],
        volatility: Volatility,
        payload: SearchResults,
    ) {
        let normalized = normalize_query(query);
        let result_key = result_key(&normalized, channels);

        let ttl = if self.settings.adaptive_ttl && volatility == Volatility::Volatile {
            Some(self.settings.volatile_ttl)
        } else {
            Some(self.settings.result_ttl)
        };

        self.queries
            .write()
            .await
            .set(&query_key(&normalized), result_key.clone(), None);
        self.results.write().await.set(&result_key, payload, ttl);
    }

    // == Lookup ==
    /// Two-step lookup: query tier resolves the result key, result tier
    /// serves the payload. Either tier missing (or expired) is a miss.
    pub async fn lookup(&self, query: &str) -> Option<SearchResults> {
        let normalized = normalize_query(query);
        let result_key = self.queries.write().await.get(&query_key(&normalized))?;
        self.results.write().await.get(&result_key)
    }

    // == Invalidation ==
    /// Removes matching entries from both tiers.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        let mut removed = 0usize;
        removed += self
            .queries
            .write()
            .await
            .delete_where(|key| pattern_matches(pattern, key));
        removed += self
            .results
            .write()
            .await
            .delete_where(|key| pattern_matches(pattern, key));
        removed
    }

    /// Drops every result set that touches the given channel. Query-tier
    /// entries pointing at a dropped result simply miss on their next
    /// lookup and recompute.
    pub async fn invalidate_channel(&self, channel: &str) -> usize {
        let pattern = format!("search:result:*{}*", channel);
        self.results
            .write()
            .await
            .delete_where(|key| pattern_matches(&pattern, key))
    }

    // == Maintenance ==
    /// Sweeps expired entries in both tiers.
    pub async fn purge_stale(&self) -> usize {
        self.queries.write().await.purge_stale() + self.results.write().await.purge_stale()
    }

    /// Metrics snapshots for the (query, result) tiers.
    pub async fn metrics(&self) -> (CacheMetrics, CacheMetrics) {
        (
            self.queries.read().await.get_metrics(),
            self.results.read().await.get_metrics(),
        )
    }
}

// == Key Helpers ==
/// Collapses whitespace and case so trivially-different spellings of the
/// same query collide.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn query_key(normalized: &str) -> String {
    format!("search:query:{}", normalized)
}

fn result_key(normalized: &str, channels: &[String]) -> String {
    let mut hasher = DefaultHasher::new();
    normalized.hash(&mut hasher);
    format!("search:result:{}:{:016x}", channels.join(","), hasher.finish())
}
