//! Integration tests for tombola-cache

use serde_json::json;
use std::sync::Arc;
use tombola_cache::*;
use tombola_core::{FixedRoller, Registry};

#[test]
fn test_cached_results_match_registry() {
    let registry = Arc::new(
        Registry::from_configuration(&json!({
            "a": ["x", "y", "z"],
            "b": { "p": 40, "q": 40 },
            "c": true
        }))
        .unwrap(),
    );
    let cached = CachedRegistry::new(Arc::clone(&registry));

    for round in 0..2 {
        for i in 0..50 {
            let ctx = format!("session-{}", i);
            for feature in ["a", "b", "c", "missing"] {
                assert_eq!(
                    cached.get_variant(&ctx, feature),
                    registry.get_variant(&ctx, feature),
                    "round {} ctx {} feature {}",
                    round,
                    ctx,
                    feature
                );
            }
        }
    }

    let stats = cached.stats();
    assert_eq!(stats.misses, 200);
    assert_eq!(stats.hits, 200);
}

#[test]
fn test_digest_uses_and_fills_cache() {
    let registry = Arc::new(Registry::with_roller(FixedRoller::new(30.0)));
    registry
        .set_configuration(&json!({
            "feature_b": 100,
            "feature_c": { "variant_a": 0, "variant_b": 20, "variant_c": 20, "variant_d": 60 }
        }))
        .unwrap();

    let cached = CachedRegistry::new(registry);
    let digest = cached.get_variant_digest("context");

    assert_eq!(digest["feature_b"].as_deref(), Some("on"));
    assert_eq!(digest["feature_c"].as_deref(), Some("variant_c"));
    assert_eq!(cached.cache().len(), 2);

    assert_eq!(cached.get_variant("context", "feature_c").as_deref(), Some("variant_c"));
    assert_eq!(cached.stats().hits, 1);
}

#[test]
fn test_custom_capacity() {
    let registry = Arc::new(Registry::from_configuration(&json!({ "f": 50 })).unwrap());
    let cached = CachedRegistry::with_cache(registry, MemoryVariantCache::with_capacity(10));

    for i in 0..25 {
        cached.get_variant(&format!("ctx-{}", i), "f");
    }
    assert!(cached.cache().len() <= 10);
}

#[test]
fn test_invalidate_by_hand() {
    let registry = Arc::new(Registry::from_configuration(&json!({ "f": 100 })).unwrap());
    let cached = CachedRegistry::new(registry);

    cached.get_variant("ctx", "f");
    cached.invalidate();
    assert!(cached.cache().is_empty());
}

#[test]
fn test_default_cache_stays_bounded_across_sessions() {
    let registry = Arc::new(Registry::from_configuration(&json!({ "f": 50 })).unwrap());
    let cached = CachedRegistry::new(registry);

    for i in 0..DEFAULT_CAPACITY + 500 {
        cached.get_variant(&format!("session-{}", i), "f");
    }
    assert!(cached.cache().len() <= DEFAULT_CAPACITY);
}

#[test]
fn test_unbounded_cache_is_opt_in() {
    let registry = Arc::new(Registry::from_configuration(&json!({ "f": 50 })).unwrap());
    let cached = CachedRegistry::with_cache(registry, MemoryVariantCache::unbounded());

    for i in 0..50 {
        cached.get_variant(&format!("ctx-{}", i), "f");
    }
    assert_eq!(cached.cache().len(), 50);
    assert_eq!(cached.cache().capacity(), None);
}
