//! Property-Based Tests for the Cache Engine
//!
//! Uses proptest to verify invariants over arbitrary operation sequences.

use proptest::prelude::*;

use crate::cache::{CacheOptions, LruCache};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

fn test_cache(max: usize) -> LruCache<String> {
    LruCache::new(CacheOptions::new(max)).unwrap()
}

// == Strategies ==
/// Generates cache keys from a deliberately small alphabet so operation
/// sequences collide on keys often.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f][0-9]{0,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// A single cache operation for sequence-based properties.
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any operation sequence, hit/miss/set/delete counters exactly match
    // the observed outcomes of each call. Entries carry no TTL here, so the
    // only removals are deletes and evictions.
    #[test]
    fn prop_counters_match_observed_outcomes(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut cache = test_cache(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut expected_sets: u64 = 0;
        let mut expected_deletes: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    if cache.set(&key, value, None) {
                        expected_sets += 1;
                    }
                }
                CacheOp::Get { key } => {
                    match cache.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    if cache.delete(&key) {
                        expected_deletes += 1;
                    }
                }
            }
        }

        let metrics = cache.get_metrics();
        prop_assert_eq!(metrics.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(metrics.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(metrics.sets, expected_sets, "Sets mismatch");
        prop_assert_eq!(metrics.deletes, expected_deletes, "Deletes mismatch");
        prop_assert_eq!(metrics.size, cache.len(), "Size mismatch");
    }

    // The entry count never exceeds the configured capacity, no matter the
    // operation sequence.
    #[test]
    fn prop_capacity_never_exceeded(
        max in 1usize..10,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let mut cache = test_cache(max);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(&key, value, None);
                }
                CacheOp::Get { key } => {
                    cache.get(&key);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                }
            }
            prop_assert!(cache.len() <= max, "Capacity exceeded: {} > {}", cache.len(), max);
        }
    }

    // A set followed immediately by a get returns the stored value.
    #[test]
    fn prop_set_get_round_trip(key in key_strategy(), value in value_strategy()) {
        let mut cache = test_cache(TEST_MAX_ENTRIES);

        prop_assert!(cache.set(&key, value.clone(), None));
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // A deleted key is gone until set again.
    #[test]
    fn prop_delete_removes(key in key_strategy(), value in value_strategy()) {
        let mut cache = test_cache(TEST_MAX_ENTRIES);

        cache.set(&key, value, None);
        prop_assert!(cache.delete(&key));
        prop_assert_eq!(cache.get(&key), None);
    }

    // The derived hit rate stays inside [0, 100].
    #[test]
    fn prop_hit_rate_in_range(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut cache = test_cache(TEST_MAX_ENTRIES);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(&key, value, None);
                }
                CacheOp::Get { key } => {
                    cache.get(&key);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                }
            }
        }

        let rate = cache.get_metrics().hit_rate;
        prop_assert!((0.0..=100.0).contains(&rate), "Hit rate out of range: {}", rate);
    }
}
