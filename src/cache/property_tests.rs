//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache's structural and behavioral
//! invariants over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::{current_timestamp_ms, CacheStore};

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;
const TEST_MEMORY: usize = 1_000_000;
const TEST_TTL: i64 = 3600;

// == Strategies ==
/// Generates valid cache keys (non-empty, bounded length)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}"
}

/// Generates valid cache values (bounded length)
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl: i64 },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (
            valid_key_strategy(),
            valid_value_strategy(),
            prop_oneof![Just(0i64), Just(TEST_TTL)]
        )
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn apply(store: &mut CacheStore, op: CacheOp) {
    match op {
        CacheOp::Set { key, value, ttl } => store.set(key, value, ttl),
        CacheOp::Get { key } => {
            let _ = store.get(&key);
        }
        CacheOp::Delete { key } => {
            let _ = store.delete(&key);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of SET operations, the number of entries never
    // exceeds the configured capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let capacity = 50;
        let mut store = CacheStore::new(capacity, TEST_MEMORY).unwrap();

        for (key, value) in entries {
            store.set(key, value, TEST_TTL);
            prop_assert!(
                store.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }
    }

    // For any sequence of SET operations whose individual entries fit
    // under the memory ceiling, the running byte total never exceeds it.
    #[test]
    fn prop_memory_ceiling_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..100
        )
    ) {
        // Keys are at most 16 bytes and values at most 64, so any single
        // entry fits and the ceiling must hold strictly.
        let max_memory = 256;
        let mut store = CacheStore::new(TEST_CAPACITY, max_memory).unwrap();

        for (key, value) in entries {
            store.set(key, value, TEST_TTL);
            prop_assert!(
                store.current_bytes() <= max_memory,
                "Byte total {} exceeds ceiling {}",
                store.current_bytes(),
                max_memory
            );
        }
    }

    // After any operation sequence, every mapped key has exactly one node
    // in the recency structure and one in the expiration structure.
    #[test]
    fn prop_structural_integrity(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(20, 2_000).unwrap();

        for op in ops {
            apply(&mut store, op);

            let (map_len, recency_len, expiry_len) = store.structure_lens();
            prop_assert_eq!(map_len, recency_len, "Recency node count diverged");
            prop_assert_eq!(map_len, expiry_len, "Expiration node count diverged");
            prop_assert!(map_len <= 20);
        }

        // A sweep far in the future drains every remaining entry and
        // leaves the structures empty together.
        store.sweep(current_timestamp_ms() + 10 * TEST_TTL as u64 * 1000);
        let remaining = store.structure_lens();
        prop_assert_eq!(remaining.0, 0);
        prop_assert_eq!(remaining.1, 0);
        prop_assert_eq!(remaining.2, 0);
        prop_assert_eq!(store.current_bytes(), 0);
    }

    // Storing a pair and retrieving it before expiration returns the
    // exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MEMORY).unwrap();

        store.set(key.clone(), value.clone(), TEST_TTL);
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // After a DELETE, a subsequent GET returns absent; deleting again is
    // a no-op.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MEMORY).unwrap();

        store.set(key.clone(), value, TEST_TTL);
        prop_assert!(store.get(&key).is_some(), "Key should exist before delete");

        prop_assert!(store.delete(&key));
        prop_assert_eq!(store.get(&key), None);
        prop_assert!(!store.delete(&key), "Second delete should be a no-op");
    }

    // Repeated SET on the same key never grows the entry count and GET
    // returns the latest value.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MEMORY).unwrap();

        store.set(key.clone(), value1, TEST_TTL);
        store.set(key.clone(), value2.clone(), TEST_TTL);

        prop_assert_eq!(store.get(&key), Some(value2.clone()));
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
        prop_assert_eq!(
            store.current_bytes(),
            key.len() + value2.len(),
            "Byte total should reflect the size delta, not a double count"
        );
    }

    // Entries written with an elapsed TTL read as absent and never
    // appear in list_all snapshots.
    #[test]
    fn prop_expired_entries_never_listed(
        entries in prop::collection::hash_map(
            valid_key_strategy(),
            (valid_value_strategy(), any::<bool>()),
            1..20
        )
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MEMORY).unwrap();

        let mut live_keys = HashSet::new();
        for (key, (value, expired)) in &entries {
            let ttl = if *expired { 0 } else { TEST_TTL };
            store.set(key.clone(), value.clone(), ttl);
            if !*expired {
                live_keys.insert(key.clone());
            }
        }

        let listed: HashSet<String> = store.list_all().into_iter().map(|i| i.key).collect();
        prop_assert_eq!(&listed, &live_keys, "Snapshot should contain exactly the live keys");

        for (key, (_, expired)) in &entries {
            if *expired {
                prop_assert_eq!(store.get(key), None);
            }
        }
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling the cache to capacity and adding one more entry evicts the
    // least recently used entry, never a fresher one.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 3..10),
        new_key in valid_key_strategy(),
        new_value in valid_value_strategy()
    ) {
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = CacheStore::new(capacity, TEST_MEMORY).unwrap();

        let oldest_key = unique_keys[0].clone();
        for key in &unique_keys {
            store.set(key.clone(), format!("value_{}", key), TEST_TTL);
        }
        prop_assert_eq!(store.len(), capacity, "Cache should be at capacity");

        store.set(new_key.clone(), new_value, TEST_TTL);

        prop_assert_eq!(store.len(), capacity, "Cache should remain at capacity after eviction");
        prop_assert_eq!(
            store.get(&oldest_key),
            None,
            "Oldest key should have been evicted"
        );
        prop_assert!(store.get(&new_key).is_some(), "New key should exist after insertion");

        for key in unique_keys.iter().skip(1) {
            prop_assert!(
                store.get(key).is_some(),
                "Key '{}' should still exist (not the oldest)",
                key
            );
        }
    }

    // A GET on an existing key makes it most recently used, so it is not
    // the next eviction candidate.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy(),
        new_value in valid_value_strategy()
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = CacheStore::new(capacity, TEST_MEMORY).unwrap();

        for key in &unique_keys {
            store.set(key.clone(), format!("value_{}", key), TEST_TTL);
        }

        // Touch the would-be eviction candidate
        let accessed_key = unique_keys[0].clone();
        let _ = store.get(&accessed_key);

        let expected_evicted = unique_keys[1].clone();
        store.set(new_key.clone(), new_value, TEST_TTL);

        prop_assert!(
            store.get(&accessed_key).is_some(),
            "Accessed key '{}' should not be evicted after being touched",
            accessed_key
        );
        prop_assert_eq!(
            store.get(&expected_evicted),
            None,
            "Oldest unaccessed key should have been evicted"
        );
        prop_assert!(store.get(&new_key).is_some(), "New key should exist");
    }
}

// == Concurrent Operation Correctness ==
// Thread-safe access through the shared handle: concurrent readers and
// writers never observe partial state and all bounds hold afterwards.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..20
        ),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        use crate::cache::Cache;

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache = std::sync::Arc::new(
                Cache::new(TEST_CAPACITY, TEST_MEMORY).unwrap()
            );

            for (key, value) in &initial_entries {
                cache.set(key.clone(), value.clone(), TEST_TTL).await;
            }

            let mut handles = Vec::new();
            for op in operations {
                let cache = cache.clone();

                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value, ttl } => {
                            cache.set(key, value, ttl).await;
                            Ok::<_, String>(())
                        }
                        CacheOp::Get { key } => {
                            if let Some(value) = cache.get(&key).await {
                                // Every write in this test is non-empty, so
                                // a read must never observe a torn or
                                // truncated value.
                                if value.is_empty() {
                                    return Err(format!("Got empty value for key '{}'", key));
                                }
                            }
                            Ok(())
                        }
                        CacheOp::Delete { key } => {
                            cache.delete(&key).await;
                            Ok(())
                        }
                    }
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            prop_assert!(cache.len().await <= TEST_CAPACITY);
            cache.shutdown();
            Ok(())
        })?;
    }
}
