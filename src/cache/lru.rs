//! Recency Tracking Module
//!
//! Maintains the access-order list used for least-recently-used eviction.

use std::collections::VecDeque;

// == Recency List ==
/// Tracks key access order for LRU eviction.
///
/// Keys live in a VecDeque where:
/// - Front = most recently used
/// - Back = least recently used
#[derive(Debug, Default)]
pub struct RecencyList {
    /// Keys ordered by recency of use
    order: VecDeque<String>,
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty recency list.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Use ==
    /// Marks a key as just used, moving it to the front.
    ///
    /// An already-tracked key is removed first; a new key is simply
    /// pushed to the front.
    pub fn record_use(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Drops a key from the list. No-op if the key is not tracked.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key, if any.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.back()
    }

    // == Length ==
    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Clear ==
    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recency_new_is_empty() {
        let list = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.peek_oldest(), None);
    }

    #[test]
    fn test_record_use_orders_by_insertion() {
        let mut list = RecencyList::new();

        list.record_use("a");
        list.record_use("b");
        list.record_use("c");

        assert_eq!(list.len(), 3);
        assert_eq!(list.peek_oldest(), Some(&"a".to_string()));
    }

    #[test]
    fn test_record_use_refreshes_existing_key() {
        let mut list = RecencyList::new();

        list.record_use("a");
        list.record_use("b");
        list.record_use("c");

        // Re-using "a" moves it to the front; "b" becomes oldest
        list.record_use("a");

        assert_eq!(list.len(), 3);
        assert_eq!(list.peek_oldest(), Some(&"b".to_string()));
    }

    #[test]
    fn test_pop_oldest_returns_lru_order() {
        let mut list = RecencyList::new();

        list.record_use("a");
        list.record_use("b");
        list.record_use("c");
        list.record_use("a");

        assert_eq!(list.pop_oldest(), Some("b".to_string()));
        assert_eq!(list.pop_oldest(), Some("c".to_string()));
        assert_eq!(list.pop_oldest(), Some("a".to_string()));
        assert_eq!(list.pop_oldest(), None);
    }

    #[test]
    fn test_remove_untracked_key_is_noop() {
        let mut list = RecencyList::new();

        list.record_use("a");
        list.remove("missing");

        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_record_use_deduplicates() {
        let mut list = RecencyList::new();

        list.record_use("a");
        list.record_use("a");
        list.record_use("a");

        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::new();

        list.record_use("a");
        list.record_use("b");
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.pop_oldest(), None);
    }
}
