//! Cache store trait definition.

/// A stored resolution, tagged with the registry generation it was computed
/// against.
///
/// `variant: None` is a real outcome ("no variant"), distinct from a miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedOutcome {
    pub generation: u64,
    pub variant: Option<String>,
}

impl CachedOutcome {
    pub fn new(generation: u64, variant: Option<String>) -> Self {
        Self {
            generation,
            variant,
        }
    }
}

/// Storage for resolved variants, keyed by (context, feature).
pub trait VariantCache: Send + Sync {
    /// Look up a previous resolution.
    ///
    /// Returns `None` on a miss. Callers compare the generation tag
    /// themselves, so stores never need to know about the registry.
    fn get(&self, context: &str, feature: &str) -> Option<CachedOutcome>;

    /// Store the outcome of a resolution.
    fn insert(&self, context: &str, feature: &str, outcome: CachedOutcome);

    /// Drop every stored outcome.
    fn clear(&self);

    /// Number of stored (context, feature) pairs.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
