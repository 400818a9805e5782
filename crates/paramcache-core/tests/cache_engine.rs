//! Integration tests for the cache engine and both key strategies.

use std::sync::Arc;

use paramcache_core::{
    AsFieldValue, CacheOptions, CacheParams, DigestKey, FastCache, FieldDescriptor, ParamCache,
    SharedCache,
};

#[derive(Debug, Clone)]
struct SearchQuery {
    resource: String,
    terms: Vec<String>,
    page: Option<u32>,
    trace_id: String,
}

impl CacheParams for SearchQuery {
    fn fields() -> Vec<FieldDescriptor<Self>> {
        vec![
            FieldDescriptor::new("resource", |q: &Self| q.resource.as_field_value()),
            FieldDescriptor::new("terms", |q: &Self| q.terms.as_field_value()),
            FieldDescriptor::new("page", |q: &Self| q.page.as_field_value()),
            FieldDescriptor::new("trace_id", |q: &Self| q.trace_id.as_field_value()),
        ]
    }
}

fn query(resource: &str, page: Option<u32>, trace_id: &str) -> SearchQuery {
    SearchQuery {
        resource: resource.to_string(),
        terms: vec!["name".to_string(), "birthdate".to_string()],
        page,
        trace_id: trace_id.to_string(),
    }
}

// =============================================================================
// Store semantics
// =============================================================================

#[test]
fn test_numeric_engine_scenario() {
    let cache = FastCache::<i32, i32>::new();
    cache.try_add(&1, 10);
    cache.try_add(&2, 20);

    assert_eq!(cache.count(), 2);
    assert_eq!(cache.get(&1), Some(10));
    assert_eq!(cache.get(&2), Some(20));
}

#[test]
fn test_first_write_wins_then_last_write_wins() {
    let cache = FastCache::<String, &'static str>::new();
    let key = "patient/1".to_string();

    assert!(cache.try_add(&key, "v1"));
    assert!(!cache.try_add(&key, "v2"));
    assert_eq!(cache.get(&key), Some("v1"));

    cache.add_or_update(&key, "v3");
    assert_eq!(cache.get(&key), Some("v3"));
    assert_eq!(cache.count(), 1);
}

#[test]
fn test_optional_values_are_never_stored() {
    let cache = FastCache::<i32, String>::new();

    assert!(!cache.try_add_optional(&1, None));
    cache.add_or_update_optional(&2, None);
    assert_eq!(cache.count(), 0);

    assert!(cache.try_add_optional(&1, Some("one".to_string())));
    assert_eq!(cache.get(&1).as_deref(), Some("one"));
}

#[test]
fn test_remove_and_clear_all() {
    let cache = FastCache::<u64, u64>::new();
    for i in 0..10 {
        cache.try_add(&i, i * 2);
    }

    cache.remove(&3);
    assert_eq!(cache.get(&3), None);
    assert_eq!(cache.count(), 9);

    cache.remove(&3);
    assert_eq!(cache.count(), 9);

    cache.clear_all();
    assert_eq!(cache.count(), 0);
    assert!((0..10).all(|i| cache.get(&i).is_none()));
}

// =============================================================================
// Capacity
// =============================================================================

#[test]
fn test_capacity_two_evicts_oldest() {
    let cache = FastCache::<String, u32>::bounded(2);
    cache.try_add(&"A".to_string(), 1);
    cache.try_add(&"B".to_string(), 2);
    cache.try_add(&"C".to_string(), 3);

    assert_eq!(cache.count(), 2);
    assert_eq!(cache.get(&"A".to_string()), None);
    assert_eq!(cache.get(&"B".to_string()), Some(2));
    assert_eq!(cache.get(&"C".to_string()), Some(3));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_capacity_n_plus_one() {
    let capacity = 25;
    let cache = SharedCache::<u32, u32>::bounded(capacity);
    for i in 0..=capacity as u32 {
        cache.try_add(&i, i);
    }

    assert_eq!(cache.count(), capacity);
    assert_eq!(cache.get(&0), None);
    assert!((1..=capacity as u32).all(|i| cache.get(&i) == Some(i)));
}

// =============================================================================
// Composite parameters
// =============================================================================

#[test]
fn test_ignored_field_collapses_entries() {
    let options = CacheOptions::default().ignore_field("trace_id");
    let cache = FastCache::<SearchQuery, usize>::with_options(options);

    cache.try_add(&query("Patient", Some(1), "trace-a"), 1);
    cache.try_add(&query("Patient", Some(1), "trace-b"), 2);

    assert_eq!(cache.count(), 1);
    assert_eq!(cache.get(&query("Patient", Some(1), "trace-c")), Some(1));
    assert_eq!(cache.field_names(), vec!["resource", "terms", "page"]);
}

#[test]
fn test_fields_distinguish_entries() {
    let cache = FastCache::<SearchQuery, usize>::new();

    cache.try_add(&query("Patient", Some(1), "t"), 1);
    cache.try_add(&query("Patient", Some(2), "t"), 2);
    cache.try_add(&query("Observation", Some(1), "t"), 3);

    assert_eq!(cache.count(), 3);
    assert_eq!(cache.get(&query("Patient", Some(2), "t")), Some(2));
}

#[test]
fn test_content_digest_is_stable_across_engines() {
    let options = CacheOptions::default().ignore_field("trace_id");
    let first = SharedCache::<SearchQuery, usize>::with_options(options.clone());
    let second = SharedCache::<SearchQuery, usize>::with_options(options);

    let a = query("Patient", None, "trace-a");
    let b = query("Patient", None, "trace-b");

    assert_eq!(first.key_for(&a), second.key_for(&a));
    assert_eq!(first.key_for(&a), second.key_for(&b));
    assert_eq!(
        first.key_for(&a),
        DigestKey::of("resource=Patientterms=name, birthdatepage=")
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_shared_across_threads_as_trait_object() {
    let cache: Arc<dyn ParamCache<u64, u64>> = Arc::new(FastCache::<u64, u64>::new());

    std::thread::scope(|scope| {
        for worker in 0..8u64 {
            let cache = Arc::clone(&cache);
            scope.spawn(move || {
                for i in 0..500 {
                    let key = worker * 1_000 + i;
                    cache.try_add(&key, key + 1);
                }
            });
        }
    });

    assert_eq!(cache.count(), 8 * 500);
    assert_eq!(cache.get(&7_499), Some(7_500));
}

#[test]
fn test_bounded_cache_under_contention() {
    let capacity = 64;
    let cache = FastCache::<u64, u64>::bounded(capacity);

    std::thread::scope(|scope| {
        for worker in 0..4u64 {
            let cache = &cache;
            scope.spawn(move || {
                for _ in 0..2_000 {
                    let key = fastrand::u64(0..10_000) + worker * 10_000;
                    cache.add_or_update(&key, key);
                    if let Some(value) = cache.get(&key) {
                        assert_eq!(value, key);
                    }
                }
            });
        }
    });

    for key in 1_000_000..1_000_000 + capacity as u64 * 2 {
        cache.try_add(&key, key);
    }
    assert_eq!(cache.count(), capacity);
}
