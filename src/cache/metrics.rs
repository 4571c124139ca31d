//! Cache Metrics Module
//!
//! Running counters for cache activity plus derived values for the
//! observability surface.

use serde::Serialize;

// == Cache Metrics ==
/// Monotonic counters plus a point-in-time size/memory snapshot.
///
/// Counters only increase within a session; `reset` explicitly zeroes them.
/// `has`/`peek` style inspection never moves these counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheMetrics {
    /// Successful retrievals
    pub hits: u64,
    /// Failed retrievals (absent or expired)
    pub misses: u64,
    /// Values stored
    pub sets: u64,
    /// Explicit removals
    pub deletes: u64,
    /// Entries removed by capacity pressure
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Hit rate as a percentage (0-100), rounded to 2 decimals
    pub hit_rate: f64,
    /// Tracked bytes; 0 when no size calculator is configured
    pub memory_usage: usize,
    /// Current number of live entries
    pub size: usize,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates metrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Recorders ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Hit Rate ==
    /// Hit rate as a percentage (0-100), rounded to 2 decimals.
    ///
    /// Returns 0 when no gets have occurred.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            let rate = self.hits as f64 / total as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        }
    }

    // == Snapshot ==
    /// Returns a copy with the derived hit rate and the given size figures
    /// filled in.
    pub fn snapshot(&self, size: usize, memory_usage: usize) -> Self {
        let mut snap = self.clone();
        snap.hit_rate = snap.hit_rate();
        snap.size = size;
        snap.memory_usage = memory_usage;
        snap
    }

    // == Reset ==
    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
