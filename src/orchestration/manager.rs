//! Cache Orchestration Module
//!
//! Gives domain services one "get-or-compute-and-store" call per resource
//! type, plus coordinated invalidation and an aggregated metrics snapshot.
//! Each named cache engine instance is owned exclusively by this layer.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{CacheMetrics, CacheOptions, LruCache};
use crate::config::{Config, DomainSettings};
use crate::error::Result;
use crate::models::{ChannelList, FileList, ThreadReplies, UserInfo};
use crate::orchestration::keys::pattern_matches;
use crate::orchestration::search::SearchCache;

// == Domain Cache ==
/// A typed handle over one named cache engine instance.
///
/// `get` takes the write lock because a read mutates recency and metrics;
/// the engine itself stays single-owner behind the lock.
pub struct DomainCache<T> {
    /// Domain name, which is also the key prefix
    name: String,
    /// The owned engine instance
    cache: Arc<RwLock<LruCache<T>>>,
    /// Per-key gates so concurrent misses on one key share one upstream call
    in_flight: Arc<SyncMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

/// Clears a key's gate from the in-flight map when its call finishes,
/// including when the caller's future is dropped mid-compute.
struct GateGuard {
    gates: Arc<SyncMutex<HashMap<String, Arc<Mutex<()>>>>>,
    key: String,
    gate: Arc<Mutex<()>>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        // Only clear the gate this call queued on; a later miss may have
        // installed a fresh one already
        if gates
            .get(&self.key)
            .is_some_and(|gate| Arc::ptr_eq(gate, &self.gate))
        {
            gates.remove(&self.key);
        }
    }
}

impl<T: Clone> DomainCache<T> {
    // == Constructor ==
    /// Builds the domain's engine from its settings. Fails fast on invalid
    /// configuration.
    pub fn new(name: &str, settings: &DomainSettings) -> Result<Self> {
        let mut options = CacheOptions::new(settings.max_entries).with_ttl(settings.ttl);
        options.update_age_on_get = settings.update_age_on_get;

        Ok(Self {
            name: name.to_string(),
            cache: Arc::new(RwLock::new(LruCache::new(options)?)),
            in_flight: Arc::new(SyncMutex::new(HashMap::new())),
        })
    }

    /// Domain name (key prefix).
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get / Set ==
    /// Cached lookup, counting a hit or miss.
    pub async fn get(&self, key: &str) -> Option<T> {
        self.cache.write().await.get(key)
    }

    /// Stores a value with an optional TTL override.
    pub async fn set(&self, key: &str, value: T, ttl: Option<Duration>) -> bool {
        self.cache.write().await.set(key, value, ttl)
    }

    /// Liveness check without touching recency or metrics.
    pub async fn has(&self, key: &str) -> bool {
        self.cache.read().await.has(key)
    }

    // == Cache Or Fetch ==
    /// Returns the cached value for `key`, or computes, stores and returns
    /// it on a miss.
    ///
    /// Single-flight per key: concurrent misses on the same key queue on a
    /// per-key gate, and every waiter but the first finds the value cached
    /// when its turn comes. A failed compute caches nothing and surfaces the
    /// error; an empty computed result is a valid value and is cached.
    pub async fn cache_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(hit) = self.cache.write().await.get(key) {
            return Ok(hit);
        }

        let gate = {
            let mut gates = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            gates
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _cleanup = GateGuard {
            gates: self.in_flight.clone(),
            key: key.to_string(),
            gate: gate.clone(),
        };
        let _guard = gate.lock().await;

        // A sibling may have filled the cache while we queued on the gate
        if let Some(hit) = self.cache.write().await.get(key) {
            return Ok(hit);
        }

        debug!(domain = %self.name, key, "cache miss, fetching upstream");
        let outcome = compute().await;

        if let Ok(value) = &outcome {
            // A declined write degrades to "always fetch", never to an error
            self.cache.write().await.set(key, value.clone(), ttl);
        }

        outcome
    }

    // == Invalidation ==
    /// Removes every entry whose key matches the glob pattern.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        self.cache
            .write()
            .await
            .delete_where(|key| pattern_matches(pattern, key))
    }

    // == Maintenance ==
    /// Eagerly sweeps expired entries.
    pub async fn purge_stale(&self) -> usize {
        self.cache.write().await.purge_stale()
    }

    /// Point-in-time metrics snapshot.
    pub async fn metrics(&self) -> CacheMetrics {
        self.cache.read().await.get_metrics()
    }

    /// Zeroes the domain's counters.
    pub async fn reset_metrics(&self) {
        self.cache.write().await.reset_metrics();
    }
}

// == Cache Orchestrator ==
/// The composition of every named cache instance: channels, users, files,
/// threads, and the two-tier search cache.
pub struct CacheOrchestrator {
    pub channels: DomainCache<ChannelList>,
    pub users: DomainCache<UserInfo>,
    pub files: DomainCache<FileList>,
    pub threads: DomainCache<ThreadReplies>,
    pub search: SearchCache,
}

impl CacheOrchestrator {
    // == Constructor ==
    /// Builds every domain cache from the configuration, failing fast on
    /// the first invalid domain.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            channels: DomainCache::new("channels", &config.channels)?,
            users: DomainCache::new("users", &config.users)?,
            files: DomainCache::new("files", &config.files)?,
            threads: DomainCache::new("threads", &config.threads)?,
            search: SearchCache::new(&config.search)?,
        })
    }

    // == Invalidate ==
    /// Applies a glob pattern across every domain, returning the number of
    /// entries removed. Keys are domain-prefixed, so a pattern like
    /// `channels:*` only ever touches its own domain.
    pub async fn invalidate(&self, pattern: &str) -> usize {
        let mut removed = 0usize;
        removed += self.channels.invalidate_pattern(pattern).await;
        removed += self.users.invalidate_pattern(pattern).await;
        removed += self.files.invalidate_pattern(pattern).await;
        removed += self.threads.invalidate_pattern(pattern).await;
        removed += self.search.invalidate_pattern(pattern).await;
        debug!(pattern, removed, "cache invalidation");
        removed
    }

    // == Purge ==
    /// Sweeps expired entries in every domain; returns per-domain counts.
    pub async fn purge_stale(&self) -> BTreeMap<String, usize> {
        let mut removed = BTreeMap::new();
        removed.insert("channels".to_string(), self.channels.purge_stale().await);
        removed.insert("users".to_string(), self.users.purge_stale().await);
        removed.insert("files".to_string(), self.files.purge_stale().await);
        removed.insert("threads".to_string(), self.threads.purge_stale().await);
        removed.insert("search".to_string(), self.search.purge_stale().await);
        removed
    }

    // == Metrics ==
    /// Per-domain snapshots keyed by name.
    pub async fn domain_metrics(&self) -> BTreeMap<String, CacheMetrics> {
        let mut domains = BTreeMap::new();
        domains.insert("channels".to_string(), self.channels.metrics().await);
        domains.insert("users".to_string(), self.users.metrics().await);
        domains.insert("files".to_string(), self.files.metrics().await);
        domains.insert("threads".to_string(), self.threads.metrics().await);
        let (queries, results) = self.search.metrics().await;
        domains.insert("search_queries".to_string(), queries);
        domains.insert("search_results".to_string(), results);
        domains
    }

    /// Counters summed across every domain, with a combined hit rate.
    pub async fn aggregate_metrics(&self) -> CacheMetrics {
        let domains = self.domain_metrics().await;
        combine_metrics(domains.values())
    }
}

// == Combine Metrics ==
/// Sums counters across snapshots and derives the combined hit rate.
pub fn combine_metrics<'a, I>(snapshots: I) -> CacheMetrics
where
    I: IntoIterator<Item = &'a CacheMetrics>,
{
    let mut total = CacheMetrics::new();
    for snap in snapshots {
        total.hits += snap.hits;
        total.misses += snap.misses;
        total.sets += snap.sets;
        total.deletes += snap.deletes;
        total.evictions += snap.evictions;
        total.expirations += snap.expirations;
        total.memory_usage += snap.memory_usage;
        total.size += snap.size;
    }
    total.hit_rate = total.hit_rate();
    total
}
