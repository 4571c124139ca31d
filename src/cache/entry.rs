//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single stored value with its TTL clock and optional computed size.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// When the entry was inserted
    pub inserted_at: Instant,
    /// Expiry deadline, None = never expires
    pub expires_at: Option<Instant>,
    /// Computed size in bytes, None when no size calculator is configured
    pub size: Option<usize>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry whose TTL clock starts now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional time-to-live; None means the entry never expires
    /// * `size` - Computed size in bytes when size accounting is enabled
    pub fn new(value: T, ttl: Option<Duration>, size: Option<usize>) -> Self {
        let now = Instant::now();
        Self {
            value,
            inserted_at: now,
            expires_at: ttl.map(|ttl| now + ttl),
            size,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's TTL has elapsed.
    ///
    /// Boundary condition: the entry is expired once the current instant is
    /// at or past the deadline, so a zero TTL expires immediately.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    // == Remaining TTL ==
    /// Returns the remaining time-to-live.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` once expired
    /// - `Some(remaining)` while the TTL is still running
    /// - `None` when the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    // == Age ==
    /// Time elapsed since insertion.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }
}
