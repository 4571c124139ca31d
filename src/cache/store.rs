//! Cache Store Module
//!
//! The LRU cache engine: HashMap storage combined with recency tracking,
//! TTL expiration, optional size-based eviction, removal listeners and
//! running metrics.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheMetrics, RecencyList};
use crate::error::{InfraError, Result};

// == Removal Cause ==
/// Why an entry left the cache. Passed to removal listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    /// Removed by LRU capacity or size pressure
    Evicted,
    /// Overwritten by a `set` on the same key
    Replaced,
    /// Removed by an explicit `delete`
    Deleted,
    /// Removed because its TTL elapsed
    Expired,
}

// == Removal Listener ==
/// Observer notified exactly once per entry removal.
///
/// Decouples cleanup side effects from the engine itself; a cache can carry
/// any number of independent listeners.
pub trait RemovalListener<T>: Send + Sync {
    fn on_removal(&self, key: &str, value: &T, cause: RemovalCause);
}

// == Size Calculator ==
/// Computes the size in bytes of a value about to be stored.
///
/// Returning None signals the value cannot be sized; `set` then declines to
/// store it rather than guessing.
pub type SizeCalculator<T> = Box<dyn Fn(&T, &str) -> Option<usize> + Send + Sync>;

// == Cache Options ==
/// Construction-time options for [`LruCache`].
pub struct CacheOptions<T> {
    /// Maximum number of entries (required, must be > 0)
    pub max_entries: usize,
    /// Default TTL applied when `set` gives no override; None = no expiry
    pub ttl: Option<Duration>,
    /// Whether a hit refreshes the entry's recency (default true)
    pub update_age_on_get: bool,
    /// Optional ceiling on total tracked bytes
    pub max_size: Option<usize>,
    /// Sizing function, required when `max_size` is set
    pub size_calculation: Option<SizeCalculator<T>>,
}

impl<T> CacheOptions<T> {
    /// Creates options with the given capacity and engine defaults.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            ttl: None,
            update_age_on_get: true,
            max_size: None,
            size_calculation: None,
        }
    }

    /// Sets the default TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Disables recency refresh on hits.
    pub fn without_age_update(mut self) -> Self {
        self.update_age_on_get = false;
        self
    }

    /// Enables size-based eviction with the given byte ceiling and sizing
    /// function.
    pub fn with_max_size(mut self, max_size: usize, calc: SizeCalculator<T>) -> Self {
        self.max_size = Some(max_size);
        self.size_calculation = Some(calc);
        self
    }
}

// == LRU Cache ==
/// Bounded key-value store with LRU eviction, TTL expiry and metrics.
///
/// Values are cloned out on `get`, so payload types are expected to be cheap
/// to clone or internally shared.
pub struct LruCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Access-order tracker
    recency: RecencyList,
    /// Running metrics
    metrics: CacheMetrics,
    /// Construction options
    options: CacheOptions<T>,
    /// Total tracked bytes; stays 0 without a size calculator
    memory_used: usize,
    /// Removal observers
    listeners: Vec<Arc<dyn RemovalListener<T>>>,
}

impl<T: Clone> LruCache<T> {
    // == Constructor ==
    /// Creates a new cache, rejecting invalid configuration synchronously.
    ///
    /// # Errors
    /// - `max_entries` of zero
    /// - `max_size` set without a `size_calculation`
    /// - `max_size` of zero
    pub fn new(options: CacheOptions<T>) -> Result<Self> {
        if options.max_entries == 0 {
            return Err(InfraError::Config(
                "cache capacity must be greater than zero".to_string(),
            ));
        }
        if options.max_size.is_some() && options.size_calculation.is_none() {
            return Err(InfraError::Config(
                "max_size requires a size_calculation function".to_string(),
            ));
        }
        if options.max_size == Some(0) {
            return Err(InfraError::Config(
                "max_size must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::new(),
            recency: RecencyList::new(),
            metrics: CacheMetrics::new(),
            options,
            memory_used: 0,
            listeners: Vec::new(),
        })
    }

    // == Add Listener ==
    /// Registers a removal observer.
    pub fn add_listener(&mut self, listener: Arc<dyn RemovalListener<T>>) {
        self.listeners.push(listener);
    }

    // == Set ==
    /// Stores a value under `key`, optionally overriding the default TTL.
    ///
    /// Returns false (leaving the cache unmodified) when the value cannot be
    /// safely stored: the size calculator declines it, or a single value
    /// exceeds the size ceiling. A failed cache write must never fail the
    /// caller's request, so this path never errors.
    pub fn set(&mut self, key: &str, value: T, ttl: Option<Duration>) -> bool {
        let size = match &self.options.size_calculation {
            Some(calc) => match calc(&value, key) {
                Some(size) => Some(size),
                None => return false,
            },
            None => None,
        };

        if let (Some(size), Some(max_size)) = (size, self.options.max_size) {
            if size > max_size {
                return false;
            }
        }

        // Overwrite: the old entry leaves with cause Replaced
        if self.entries.contains_key(key) {
            self.remove_entry(key, RemovalCause::Replaced);
        }

        // Capacity pressure: evict least recently used
        while self.entries.len() >= self.options.max_entries {
            if !self.evict_oldest() {
                break;
            }
        }

        // Size pressure: evict until the new value fits
        if let (Some(size), Some(max_size)) = (size, self.options.max_size) {
            while self.memory_used + size > max_size && !self.entries.is_empty() {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        let effective_ttl = ttl.or(self.options.ttl);
        let entry = CacheEntry::new(value, effective_ttl, size);

        self.memory_used += size.unwrap_or(0);
        self.entries.insert(key.to_string(), entry);
        self.recency.record_use(key);
        self.metrics.record_set();

        true
    }

    // == Get ==
    /// Retrieves a value, counting a hit or miss.
    ///
    /// An expired entry is lazily purged and reported as a miss. A hit
    /// refreshes recency when `update_age_on_get` is enabled.
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.remove_entry(key, RemovalCause::Expired);
                self.metrics.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.metrics.record_hit();
                if self.options.update_age_on_get {
                    self.recency.record_use(key);
                }
                Some(value)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the live value without touching metrics or recency.
    pub fn peek(&self, key: &str) -> Option<&T> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| &entry.value)
    }

    // == Has ==
    /// Liveness check; an expired-but-unpurged entry reports false.
    /// Never moves metrics or recency.
    pub fn has(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    // == Delete ==
    /// Removes an entry regardless of expiry. Returns whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            self.remove_entry(key, RemovalCause::Deleted);
            true
        } else {
            false
        }
    }

    // == Delete Where ==
    /// Removes every entry whose key satisfies the predicate; returns the
    /// number removed. Used for pattern invalidation.
    pub fn delete_where<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pred(key))
            .cloned()
            .collect();

        for key in &matched {
            self.remove_entry(key, RemovalCause::Deleted);
        }
        matched.len()
    }

    // == Clear ==
    /// Drops every entry and zeroes size accounting. Does not fire
    /// per-entry removal notifications.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.memory_used = 0;
    }

    // == Purge Stale ==
    /// Eagerly removes expired-but-unaccessed entries; returns the count.
    pub fn purge_stale(&mut self) -> usize {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.remove_entry(key, RemovalCause::Expired);
        }
        stale.len()
    }

    // == Metrics ==
    /// Point-in-time metrics snapshot with derived hit rate.
    pub fn get_metrics(&self) -> CacheMetrics {
        self.metrics.snapshot(self.entries.len(), self.memory_used)
    }

    /// Zeroes every counter.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    // == Length ==
    /// Current number of entries, including expired-but-unpurged ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked bytes; 0 when no size calculator is configured.
    pub fn memory_usage(&self) -> usize {
        self.memory_used
    }

    // == Internals ==
    /// Evicts the least recently used entry. An entry that had already
    /// expired counts as an expiration, not an eviction.
    fn evict_oldest(&mut self) -> bool {
        let Some(oldest) = self.recency.peek_oldest().cloned() else {
            return false;
        };
        let cause = match self.entries.get(&oldest) {
            Some(entry) if entry.is_expired() => RemovalCause::Expired,
            Some(_) => RemovalCause::Evicted,
            None => return false,
        };
        self.remove_entry(&oldest, cause);
        true
    }

    /// Shared removal path: drops the entry, updates accounting and metrics,
    /// and notifies listeners exactly once.
    fn remove_entry(&mut self, key: &str, cause: RemovalCause) {
        let Some(entry) = self.entries.remove(key) else {
            return;
        };
        self.recency.remove(key);
        self.memory_used = self.memory_used.saturating_sub(entry.size.unwrap_or(0));

        match cause {
            RemovalCause::Evicted => self.metrics.record_eviction(),
            RemovalCause::Expired => self.metrics.record_expiration(),
            RemovalCause::Deleted => self.metrics.record_delete(),
            RemovalCause::Replaced => {}
        }

        for listener in &self.listeners {
            listener.on_removal(key, &entry.value, cause);
        }
    }
}

impl<T> fmt::Debug for LruCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.options.max_entries)
            .field("ttl", &self.options.ttl)
            .field("max_size", &self.options.max_size)
            .field("memory_used", &self.memory_used)
            .finish()
    }
}
