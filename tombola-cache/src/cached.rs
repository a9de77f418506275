//! Memoizing wrapper around a registry.

use crate::memory::MemoryVariantCache;
use crate::traits::{CachedOutcome, VariantCache};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tombola_core::{Digest, Registry, Roller, Sha256Roller};
use tombola_log::{debug, trace};

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before any lookup.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Registry front that remembers each (context, feature) outcome.
///
/// Resolution is already deterministic, so the cache only saves hashing.
/// Each stored outcome carries the registry generation it was resolved
/// against and only counts as a hit while that generation is current.
/// A generation change also empties the cache before the next lookup.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use std::sync::Arc;
/// use tombola_cache::CachedRegistry;
/// use tombola_core::Registry;
///
/// let registry = Arc::new(Registry::from_configuration(&json!({ "beta": 100 })).unwrap());
/// let cached = CachedRegistry::new(registry);
///
/// assert_eq!(cached.get_variant("ctx", "beta").as_deref(), Some("on"));
/// assert_eq!(cached.get_variant("ctx", "beta").as_deref(), Some("on"));
/// assert_eq!(cached.stats().hits, 1);
/// ```
pub struct CachedRegistry<C: VariantCache = MemoryVariantCache, R: Roller = Sha256Roller> {
    registry: Arc<Registry<R>>,
    cache: C,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<R: Roller> CachedRegistry<MemoryVariantCache, R> {
    pub fn new(registry: Arc<Registry<R>>) -> Self {
        Self::with_cache(registry, MemoryVariantCache::new())
    }
}

impl<C: VariantCache, R: Roller> CachedRegistry<C, R> {
    pub fn with_cache(registry: Arc<Registry<R>>, cache: C) -> Self {
        let generation = registry.generation();
        Self {
            registry,
            cache,
            generation: AtomicU64::new(generation),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<Registry<R>> {
        &self.registry
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn get_variant(&self, context: &str, feature: &str) -> Option<String> {
        let generation = self.sync_generation();

        if let Some(variant) = self.lookup(generation, context, feature) {
            return variant;
        }

        let outcome = self.registry.get_variant(context, feature);
        self.store(generation, context, feature, &outcome);
        outcome
    }

    /// Digest of every registered feature, filling the cache as it goes.
    pub fn get_variant_digest(&self, context: &str) -> Digest {
        let generation = self.sync_generation();
        let snapshot = self.registry.snapshot();

        snapshot
            .features()
            .keys()
            .map(|feature| {
                let outcome = match self.lookup(generation, context, feature) {
                    Some(variant) => variant,
                    None => {
                        let outcome = snapshot.get_variant(context, feature);
                        self.store(generation, context, feature, &outcome);
                        outcome
                    }
                };
                (feature.clone(), outcome)
            })
            .collect()
    }

    /// Empty the cache by hand.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Clear the cache if the registry changed since the last lookup.
    fn sync_generation(&self) -> u64 {
        let current = self.registry.generation();
        let previous = self.generation.swap(current, Ordering::SeqCst);
        if previous != current {
            debug!(
                target: "tombola::cache",
                "registry generation {} -> {}, dropping {} cached outcomes",
                previous,
                current,
                self.cache.len()
            );
            self.cache.clear();
        }
        current
    }

    /// Cached outcome for the pair, counting a hit or a miss. Entries tagged
    /// with another generation are misses.
    fn lookup(&self, generation: u64, context: &str, feature: &str) -> Option<Option<String>> {
        match self.cache.get(context, feature) {
            Some(cached) if cached.generation == generation => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(cached.variant)
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn store(&self, generation: u64, context: &str, feature: &str, outcome: &Option<String>) {
        // Skip outcomes computed against a configuration that has since changed.
        if self.registry.generation() != generation {
            trace!(target: "tombola::cache", "stale outcome for {} not cached", feature);
            return;
        }
        self.cache
            .insert(context, feature, CachedOutcome::new(generation, outcome.clone()));
    }
}
