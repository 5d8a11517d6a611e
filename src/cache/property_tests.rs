//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache contract over generated workloads.

use proptest::prelude::*;
use std::collections::HashMap;

use chrono::TimeDelta;

use crate::cache::Cache;

// == Test Configuration ==
/// Interval long enough that generated workloads never trip the throttle, so
/// only the deterministic removal paths run.
const QUIET_INTERVAL_SECS: i64 = 3600;
const LONG_TTL_SECS: i64 = 300;

fn quiet_cache() -> Cache<String> {
    Cache::new(TimeDelta::seconds(QUIET_INTERVAL_SECS))
}

// == Strategies ==
/// Generates valid cache keys (non-empty, bounded length)
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    SetPreExpired { key: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::SetPreExpired { key }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, a final Get on each touched key
    // returns exactly what the sequential model predicts, and the hit/miss
    // counters match the model as well.
    #[test]
    fn prop_sequential_model_agreement(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = quiet_cache();
            let mut model: HashMap<String, Option<String>> = HashMap::new();
            let mut expected_hits: u64 = 0;
            let mut expected_misses: u64 = 0;

            for op in ops {
                match op {
                    CacheOp::Set { key, value } => {
                        cache.set(key.clone(), value.clone(), TimeDelta::seconds(LONG_TTL_SECS)).await;
                        model.insert(key, Some(value));
                    }
                    CacheOp::SetPreExpired { key } => {
                        cache.set(key.clone(), "tombstone".to_string(), TimeDelta::nanoseconds(-1)).await;
                        model.insert(key, None);
                    }
                    CacheOp::Get { key } => {
                        let got = cache.get(&key).await;
                        let expected = model.get(&key).cloned().flatten();
                        prop_assert_eq!(&got, &expected, "Get mismatch for key {}", key);
                        match got {
                            Some(_) => expected_hits += 1,
                            None => expected_misses += 1,
                        }
                        // A lazy removal makes the key plain-absent
                        if expected.is_none() {
                            model.insert(key, None);
                        }
                    }
                    CacheOp::Delete { key } => {
                        cache.delete(&key).await;
                        model.insert(key, None);
                    }
                }
            }

            let stats = cache.stats().await;
            prop_assert_eq!(stats.sweeps, 0, "Throttle must hold for the whole workload");
            prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
            prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");

            for (key, expected) in &model {
                prop_assert_eq!(&cache.get(key).await, expected, "Final state mismatch for key {}", key);
            }
            Ok(())
        })?;
    }

    // Storing a pair and retrieving it before expiration returns the exact
    // value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = quiet_cache();

            cache.set(key.clone(), value.clone(), TimeDelta::seconds(LONG_TTL_SECS)).await;

            let retrieved = cache.get(&key).await;
            prop_assert_eq!(retrieved, Some(value), "Round-trip value mismatch");
            Ok(())
        })?;
    }

    // After Delete, Get returns not-found regardless of prior TTL state.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = quiet_cache();

            cache.set(key.clone(), value, TimeDelta::seconds(LONG_TTL_SECS)).await;
            prop_assert!(cache.get(&key).await.is_some(), "Key should exist before delete");

            cache.delete(&key).await;

            prop_assert!(cache.get(&key).await.is_none(), "Key should not exist after delete");
            Ok(())
        })?;
    }

    // Storing V1 then V2 under the same key makes Get return V2 and leaves a
    // single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = quiet_cache();

            cache.set(key.clone(), value1, TimeDelta::seconds(LONG_TTL_SECS)).await;
            cache.set(key.clone(), value2.clone(), TimeDelta::seconds(LONG_TTL_SECS)).await;

            let retrieved = cache.get(&key).await;
            prop_assert_eq!(retrieved, Some(value2), "Overwrite should return new value");
            prop_assert_eq!(cache.len().await, 1, "Should have exactly one entry after overwrite");
            Ok(())
        })?;
    }

    // Items returns exactly the live entries: every key written with a
    // positive TTL and not pre-expired afterwards, nothing else.
    #[test]
    fn prop_items_matches_live_set(
        writes in prop::collection::vec((key_strategy(), value_strategy(), any::<bool>()), 1..40)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = quiet_cache();
            let mut model: HashMap<String, Option<String>> = HashMap::new();

            for (key, value, live) in writes {
                let ttl = if live {
                    TimeDelta::seconds(LONG_TTL_SECS)
                } else {
                    TimeDelta::nanoseconds(-1)
                };
                cache.set(key.clone(), value.clone(), ttl).await;
                model.insert(key, live.then_some(value));
            }

            let items = cache.items().await;
            let live_model: HashMap<String, String> = model
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect();

            prop_assert_eq!(items, live_model, "Items must contain exactly the live entries");
            Ok(())
        })?;
    }
}

// == Concurrent Operation Correctness ==
// Concurrent get/set/delete across tasks must never panic or corrupt the
// map, and the surviving state must stay within the bounds any serialization
// of the operations allows.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec((key_strategy(), value_strategy()), 1..20),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let cache = quiet_cache();

            let mut touched: std::collections::HashSet<String> = std::collections::HashSet::new();
            for (key, value) in &initial_entries {
                cache.set(key.clone(), value.clone(), TimeDelta::seconds(LONG_TTL_SECS)).await;
                touched.insert(key.clone());
            }

            let mut handles = vec![];
            for op in operations {
                if let CacheOp::Set { key, .. }
                | CacheOp::SetPreExpired { key }
                | CacheOp::Delete { key } = &op
                {
                    touched.insert(key.clone());
                }

                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            cache.set(key, value, TimeDelta::seconds(LONG_TTL_SECS)).await;
                        }
                        CacheOp::SetPreExpired { key } => {
                            cache.set(key, "tombstone".to_string(), TimeDelta::nanoseconds(-1)).await;
                        }
                        CacheOp::Get { key } => {
                            let _ = cache.get(&key).await;
                        }
                        CacheOp::Delete { key } => {
                            cache.delete(&key).await;
                        }
                    }
                }));
            }

            for handle in handles {
                handle.await.expect("Task should not panic");
            }

            // The map never holds more keys than were ever written
            prop_assert!(cache.len().await <= touched.len(), "Cache grew beyond written key set");

            // Every surviving entry is live and was written at some point
            let items = cache.items().await;
            for (key, value) in &items {
                prop_assert!(touched.contains(key), "Unknown key {} in items", key);
                prop_assert!(!value.is_empty(), "Corrupted value for key {}", key);
            }

            let stats = cache.stats().await;
            let hit_rate = stats.hit_rate();
            prop_assert!((0.0..=1.0).contains(&hit_rate), "Hit rate out of range: {}", hit_rate);
            Ok(())
        })?;
    }
}
