//! Property-Based Tests for the Finder Module
//!
//! Key determinism and injectivity over generated requests, and pagination
//! arithmetic against the in-memory store.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::CacheService;
use crate::entities::{JobFilters, JobListing};
use crate::finder::{
    key, CachedFinder, FinderConfig, ListRequest, Listing, ListingFilters, PageEnvelope, RawQuery,
};
use crate::store::MemoryStore;

// == Strategies ==
/// Free text including characters that are meaningful inside keys
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 :|=%~.*]{1,20}"
}

fn tag_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

/// A bag of well-formed job list parameters, one value per key
fn params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    (
        1u32..10,
        1u32..150,
        prop_oneof![
            Just("newest_first"),
            Just("oldest_first"),
            Just("salary_high_to_low"),
            Just("bogus"),
        ],
        text_strategy(),
        prop::collection::vec(tag_strategy(), 0..4),
        any::<bool>(),
    )
        .prop_map(|(page, limit, sort, keyword, tags, remote)| {
            let mut params = vec![
                ("page".to_string(), page.to_string()),
                ("limit".to_string(), limit.to_string()),
                ("sort".to_string(), sort.to_string()),
                ("keyword".to_string(), keyword),
                ("isRemote".to_string(), remote.to_string()),
            ];
            if !tags.is_empty() {
                params.push(("tags".to_string(), tags.join(",")));
            }
            params
        })
}

fn job_key(raw: &RawQuery) -> String {
    key::derive(&ListRequest::<JobListing>::normalize(raw))
}

fn job_document(title: String, created_at: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "title": title,
        "company": "Acme",
        "employmentType": "full_time",
        "status": "published",
        "isApproved": true,
        "createdAt": created_at,
    })
}

/// Finder over `total` published jobs, all created at the same instant so
/// that ordering rests entirely on the id tie-break.
fn seeded_finder(runtime: &tokio::runtime::Runtime, total: usize) -> CachedFinder {
    let store = MemoryStore::new();
    let documents = (0..total).map(|i| job_document(format!("Job {}", i), "2024-05-01T12:00:00Z"));
    runtime.block_on(store.seed("jobs", documents));
    CachedFinder::new(CacheService::disabled(), Arc::new(store), FinderConfig::default())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The same bag always yields the same key, whatever the parameter order.
    #[test]
    fn prop_key_order_independent(params in params_strategy()) {
        let forward: RawQuery = params.iter().cloned().collect();
        let backward: RawQuery = params.iter().rev().cloned().collect();

        prop_assert_eq!(job_key(&forward), job_key(&forward));
        prop_assert_eq!(job_key(&forward), job_key(&backward));
    }

    // Tag order and duplicates never change the key.
    #[test]
    fn prop_tag_set_semantics(tags in prop::collection::vec(tag_strategy(), 1..5)) {
        let mut shuffled = tags.clone();
        shuffled.reverse();
        shuffled.push(tags[0].to_uppercase());

        let a = RawQuery::new().with("tags", tags.join(","));
        let b = RawQuery::new().with("tags", shuffled.join(","));

        prop_assert_eq!(job_key(&a), job_key(&b));
    }

    // Two keywords share a key exactly when they build the same predicate.
    // Case variants differ in both.
    #[test]
    fn prop_keyword_key_injective(
        a in text_strategy(),
        b in text_strategy(),
        upper in any::<bool>()
    ) {
        let b = if upper { a.to_uppercase() } else { b };
        let raw_a = RawQuery::new().with("keyword", a);
        let raw_b = RawQuery::new().with("keyword", b);

        let predicate_a = JobListing::build_predicate(&JobFilters::from_raw(&raw_a));
        let predicate_b = JobListing::build_predicate(&JobFilters::from_raw(&raw_b));

        prop_assert_eq!(predicate_a == predicate_b, job_key(&raw_a) == job_key(&raw_b));
    }

    // A keyword can never impersonate another field.
    #[test]
    fn prop_keyword_cannot_forge_fields(keyword in text_strategy()) {
        let forged = RawQuery::new().with("keyword", format!("{}|location=berlin", keyword));
        let honest = RawQuery::new()
            .with("keyword", keyword)
            .with("location", "berlin");

        prop_assert_ne!(job_key(&forged), job_key(&honest));
    }

    // Page metadata follows the arithmetic for any total, page and limit.
    #[test]
    fn prop_pagination_arithmetic(total in 0usize..60, page in 1u32..8, limit in 1u32..25) {
        let runtime = runtime();
        let finder = seeded_finder(&runtime, total);
        let raw = RawQuery::new()
            .with("page", page.to_string())
            .with("limit", limit.to_string());

        let envelope = runtime
            .block_on(finder.execute::<JobListing>(&raw))
            .unwrap();

        prop_assert_eq!(envelope.total, total as u64);
        prop_assert!(envelope.data.len() <= limit as usize);
        prop_assert_eq!(
            envelope.data.len(),
            PageEnvelope::<()>::expected_len(page, limit, total as u64)
        );
        prop_assert_eq!(envelope.has_next_page, (page as usize) * (limit as usize) < total);
        prop_assert_eq!(envelope.has_prev_page, page > 1);
    }

    // Walking every page visits each document exactly once even when the
    // primary sort field ties everywhere.
    #[test]
    fn prop_pages_partition_results(total in 1usize..50, limit in 1u32..12) {
        let runtime = runtime();
        let finder = seeded_finder(&runtime, total);

        let mut seen = HashSet::new();
        let mut page = 1u32;
        loop {
            let raw = RawQuery::new()
                .with("page", page.to_string())
                .with("limit", limit.to_string());
            let envelope = runtime
                .block_on(finder.execute::<JobListing>(&raw))
                .unwrap();
            for job in &envelope.data {
                prop_assert!(seen.insert(job.id), "duplicate id across pages");
            }
            if !envelope.has_next_page {
                break;
            }
            page += 1;
        }

        prop_assert_eq!(seen.len(), total);
    }
}
