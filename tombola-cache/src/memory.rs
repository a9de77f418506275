//! In-memory variant cache.

use crate::traits::{CachedOutcome, VariantCache};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Entry bound used by [`MemoryVariantCache::new`].
pub const DEFAULT_CAPACITY: usize = 100_000;

#[derive(Default)]
struct Entries {
    by_context: HashMap<String, HashMap<String, CachedOutcome>>,
    len: usize,
}

/// Process-local cache backed by a nested hash map.
///
/// The cache is emptied once it holds `capacity` entries rather than
/// tracking recency. Contexts are usually session ids, so only
/// [`MemoryVariantCache::unbounded`] opts out of the bound.
pub struct MemoryVariantCache {
    entries: RwLock<Entries>,
    capacity: Option<usize>,
}

impl Default for MemoryVariantCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVariantCache {
    /// A cache bounded at [`DEFAULT_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            capacity: Some(capacity.max(1)),
        }
    }

    /// A cache that never flushes on its own. Only suitable for a known,
    /// finite set of contexts.
    pub fn unbounded() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            capacity: None,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of distinct contexts with at least one stored outcome.
    pub fn contexts(&self) -> usize {
        self.entries.read().by_context.len()
    }
}

impl VariantCache for MemoryVariantCache {
    fn get(&self, context: &str, feature: &str) -> Option<CachedOutcome> {
        self.entries
            .read()
            .by_context
            .get(context)
            .and_then(|features| features.get(feature))
            .cloned()
    }

    fn insert(&self, context: &str, feature: &str, outcome: CachedOutcome) {
        let mut entries = self.entries.write();

        if let Some(capacity) = self.capacity
            && entries.len >= capacity
        {
            entries.by_context.clear();
            entries.len = 0;
        }

        let previous = entries
            .by_context
            .entry(context.to_string())
            .or_default()
            .insert(feature.to_string(), outcome);
        if previous.is_none() {
            entries.len += 1;
        }
    }

    fn clear(&self) {
        let mut entries = self.entries.write();
        entries.by_context.clear();
        entries.len = 0;
    }

    fn len(&self) -> usize {
        self.entries.read().len
    }
}
