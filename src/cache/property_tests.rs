//! Property-Based Tests for the Cache Module
//!
//! Round-trip, invalidation scope and capacity properties of the in-memory
//! store, plus the fail-open round trip through `CacheService`.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheService, CacheStore, MemoryCache};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 1000;
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Entity namespaces used as key prefixes
fn entity_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("jobs"), Just("blogs"), Just("feedback")]
}

/// Key suffix below an entity prefix
fn suffix_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9=|~%]{1,48}"
}

/// Serialized-page-like values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 {}\":,]{1,256}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // set(key, v) followed immediately by get(key) returns v.
    #[test]
    fn prop_roundtrip_storage(
        entity in entity_strategy(),
        suffix in suffix_strategy(),
        value in value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        let key = format!("{}:{}", entity, suffix);

        store.set(key.clone(), value.clone(), TEST_TTL).unwrap();

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // After deleting an entity prefix, every key under it is gone and every
    // key under another entity is untouched.
    #[test]
    fn prop_invalidation_scope(
        entries in prop::collection::vec((entity_strategy(), suffix_strategy()), 1..60),
        target in entity_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        let keys: HashSet<String> = entries
            .iter()
            .map(|(entity, suffix)| format!("{}:{}", entity, suffix))
            .collect();

        for key in &keys {
            store.set(key.clone(), "page".to_string(), TEST_TTL).unwrap();
        }

        let prefix = format!("{}:", target);
        let expected_removed = keys.iter().filter(|k| k.starts_with(&prefix)).count();

        prop_assert_eq!(store.delete_by_prefix(&prefix), expected_removed);

        for key in &keys {
            if key.starts_with(&prefix) {
                prop_assert!(store.get(key).is_none(), "{} survived invalidation", key);
            } else {
                prop_assert!(store.get(key).is_some(), "{} was wrongly invalidated", key);
            }
        }
    }

    // The store never grows past its capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((suffix_strategy(), value_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let mut store = CacheStore::new(max_entries);

        for (key, value) in entries {
            let _ = store.set(key, value, TEST_TTL);
            prop_assert!(store.len() <= max_entries, "size {} exceeds {}", store.len(), max_entries);
        }
    }

    // Hits and misses reported by the store match what callers observed.
    #[test]
    fn prop_statistics_accuracy(
        writes in prop::collection::vec(suffix_strategy(), 0..30),
        reads in prop::collection::vec(suffix_strategy(), 1..30)
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        for key in &writes {
            store.set(key.clone(), "v".to_string(), TEST_TTL).unwrap();
        }

        let mut hits = 0u64;
        let mut misses = 0u64;
        for key in &reads {
            match store.get(key) {
                Some(_) => hits += 1,
                None => misses += 1,
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
        prop_assert_eq!(stats.total_entries, store.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // The service-level round trip returns an equal decoded value.
    #[test]
    fn prop_service_roundtrip(
        suffix in suffix_strategy(),
        items in prop::collection::vec(any::<u32>(), 0..40)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let service = CacheService::new(Arc::new(MemoryCache::new(TEST_MAX_ENTRIES)));
        let key = format!("jobs:{}", suffix);

        let (stored, fetched) = runtime.block_on(async {
            let stored = service.set(&key, &items, TEST_TTL).await;
            (stored, service.get::<Vec<u32>>(&key).await)
        });

        prop_assert!(stored);
        prop_assert_eq!(fetched, Some(items));
    }
}
