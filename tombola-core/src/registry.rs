//! Feature registry
//!
//! The registry owns the normalized table of every configured feature and is
//! the only place where configuration changes. Readers work against an
//! immutable snapshot, so a digest never mixes two configurations.

use crate::error::{CoreError, CoreResult};
use crate::feature::RawFeature;
use crate::overrides::Overrides;
use crate::resolver::{self, SaltStrategy};
use crate::roller::{Roller, Sha256Roller};
use crate::table::CumulativeTable;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tombola_log::debug;

/// Normalized tables keyed by feature name, in configuration order.
pub type FeatureMap = IndexMap<String, CumulativeTable>;

/// Winning variant (or `None`) of every registered feature for one context.
pub type Digest = IndexMap<String, Option<String>>;

/// Registry of features with their cumulative odds tables.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tombola_core::Registry;
///
/// let registry = Registry::new();
/// registry
///     .set_configuration(&json!({
///         "new_checkout": true,
///         "legacy_banner": false,
///         "button_color": ["red", "green", "blue"],
///     }))
///     .unwrap();
///
/// assert_eq!(registry.get_variant("session-1", "new_checkout").as_deref(), Some("on"));
/// assert_eq!(registry.get_variant("session-1", "legacy_banner"), None);
/// assert!(registry.get_variant("session-1", "button_color").is_some());
///
/// registry.apply_overrides("button_color:green");
/// assert_eq!(registry.get_variant("anyone", "button_color").as_deref(), Some("green"));
/// ```
pub struct Registry<R: Roller = Sha256Roller> {
    features: RwLock<Arc<FeatureMap>>,
    generation: AtomicU64,
    salt: SaltStrategy,
    roller: R,
}

impl Registry<Sha256Roller> {
    /// Create an empty registry using SHA-256 rolls.
    pub fn new() -> Self {
        Self::with_roller(Sha256Roller)
    }

    /// Create a registry and load `raw` into it.
    pub fn from_configuration(raw: &Value) -> CoreResult<Self> {
        let registry = Self::new();
        registry.set_configuration(raw)?;
        Ok(registry)
    }
}

impl Default for Registry<Sha256Roller> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Roller> Registry<R> {
    /// Create an empty registry with a custom roll source.
    pub fn with_roller(roller: R) -> Self {
        Self {
            features: RwLock::new(Arc::new(FeatureMap::new())),
            generation: AtomicU64::new(0),
            salt: SaltStrategy::default(),
            roller,
        }
    }

    /// Use `salt` to build the roll input for each (context, feature) pair.
    pub fn with_salt(mut self, salt: SaltStrategy) -> Self {
        self.salt = salt;
        self
    }

    pub fn salt_strategy(&self) -> SaltStrategy {
        self.salt
    }

    pub fn roller(&self) -> &R {
        &self.roller
    }

    /// Replace every feature with the ones described by `raw`.
    ///
    /// `raw` must be a JSON object; anything else fails with
    /// [`CoreError::InvalidConfiguration`] and leaves the registry untouched.
    /// Features previously added by overrides are dropped as well.
    pub fn set_configuration(&self, raw: &Value) -> CoreResult<()> {
        let map = raw.as_object().ok_or_else(|| {
            CoreError::InvalidConfiguration(format!(
                "expected a mapping of feature names, got {}",
                value_kind(raw)
            ))
        })?;

        self.set_features(
            map.iter()
                .map(|(name, feature)| (name.clone(), RawFeature::from_value(feature))),
        );
        Ok(())
    }

    /// Replace every feature with already-classified raw features.
    pub fn set_features<I, S>(&self, features: I)
    where
        I: IntoIterator<Item = (S, RawFeature)>,
        S: Into<String>,
    {
        let normalized: FeatureMap = features
            .into_iter()
            .map(|(name, raw)| (name.into(), raw.normalize()))
            .collect();
        let count = normalized.len();

        *self.features.write() = Arc::new(normalized);
        self.generation.fetch_add(1, Ordering::SeqCst);

        debug!(target: "tombola::registry", "configuration replaced with {} features", count);
    }

    /// Pin features to single variants, leaving unmentioned features alone.
    ///
    /// A feature named by an override but absent from the configuration is
    /// added. It lives until the next [`set_configuration`](Self::set_configuration).
    pub fn apply_overrides(&self, overrides: impl Into<Overrides>) {
        let overrides = overrides.into();
        if overrides.is_empty() {
            return;
        }

        {
            let mut guard = self.features.write();
            let features = Arc::make_mut(&mut *guard);
            for (feature, directive) in overrides.iter() {
                features.insert(feature.to_string(), directive.table());
            }
        }
        self.generation.fetch_add(1, Ordering::SeqCst);

        debug!(
            target: "tombola::registry",
            "applied {} overrides: {:?}",
            overrides.len(),
            overrides.iter().map(|(name, _)| name).collect::<Vec<_>>()
        );
    }

    /// Winning variant of `feature` for `context`, or `None` when the
    /// feature is unknown, empty, or the roll lands in an unassigned tail.
    pub fn get_variant(&self, context: &str, feature: &str) -> Option<String> {
        self.snapshot().get_variant(context, feature)
    }

    /// Resolve every registered feature for `context`.
    pub fn get_variant_digest(&self, context: &str) -> Digest {
        self.snapshot().digest(context)
    }

    /// A consistent view of the current configuration.
    pub fn snapshot(&self) -> Snapshot<'_, R> {
        Snapshot {
            features: Arc::clone(&self.features.read()),
            registry: self,
        }
    }

    pub fn table(&self, feature: &str) -> Option<CumulativeTable> {
        self.features.read().get(feature).cloned()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.read().contains_key(feature)
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.features.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.read().is_empty()
    }

    /// Counter bumped by every successful mutation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl<R: Roller> std::fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("features", &self.feature_names())
            .field("generation", &self.generation())
            .field("salt", &self.salt)
            .finish()
    }
}

/// Immutable view of a registry's features at one point in time.
pub struct Snapshot<'r, R: Roller> {
    features: Arc<FeatureMap>,
    registry: &'r Registry<R>,
}

impl<R: Roller> Snapshot<'_, R> {
    pub fn get_variant(&self, context: &str, feature: &str) -> Option<String> {
        let table = self.features.get(feature)?;
        resolver::resolve(
            table,
            context,
            feature,
            self.registry.salt,
            &self.registry.roller,
        )
        .map(str::to_string)
    }

    pub fn digest(&self, context: &str) -> Digest {
        self.features
            .keys()
            .map(|feature| (feature.clone(), self.get_variant(context, feature)))
            .collect()
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roller::FixedRoller;
    use serde_json::json;

    #[test]
    fn test_rejects_non_mapping_and_keeps_state() {
        let registry = Registry::new();
        registry.set_configuration(&json!({ "a": 100 })).unwrap();
        let generation = registry.generation();

        let err = registry
            .set_configuration(&json!("Not an object"))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("a string"));

        assert_eq!(registry.feature_names(), vec!["a".to_string()]);
        assert_eq!(registry.generation(), generation);
    }

    #[test]
    fn test_set_configuration_replaces_wholesale() {
        let registry = Registry::new();
        registry.set_configuration(&json!({ "a": 100, "b": 0 })).unwrap();
        registry.set_configuration(&json!({ "c": 100 })).unwrap();

        assert_eq!(registry.feature_names(), vec!["c".to_string()]);
        assert_eq!(registry.get_variant("ctx", "a"), None);
    }

    #[test]
    fn test_overrides_patch_individual_features() {
        let registry = Registry::with_roller(FixedRoller::new(99.0));
        registry
            .set_configuration(&json!({ "a": { "x": 10, "y": 10 }, "b": 100 }))
            .unwrap();
        assert_eq!(registry.get_variant("ctx", "a"), None);

        registry.apply_overrides(json!({ "a": "y" }));
        assert_eq!(registry.get_variant("ctx", "a").as_deref(), Some("y"));
        assert_eq!(registry.get_variant("ctx", "b").as_deref(), Some("on"));
        assert_eq!(registry.table("a"), Some(CumulativeTable::forced("y")));
    }

    #[test]
    fn test_override_adds_unknown_feature_until_reconfigured() {
        let registry = Registry::new();
        registry.set_configuration(&json!({})).unwrap();

        registry.apply_overrides("brand_new");
        assert_eq!(registry.get_variant("ctx", "brand_new").as_deref(), Some("on"));

        registry.set_configuration(&json!({})).unwrap();
        assert!(!registry.contains("brand_new"));
    }

    #[test]
    fn test_override_disable() {
        let registry = Registry::new();
        registry.set_configuration(&json!({ "a": true })).unwrap();
        registry.apply_overrides(json!({ "a": false }));
        assert_eq!(registry.get_variant("ctx", "a"), None);
    }

    #[test]
    fn test_empty_overrides_do_not_bump_generation() {
        let registry = Registry::new();
        let generation = registry.generation();
        registry.apply_overrides("42");
        assert_eq!(registry.generation(), generation);
    }

    #[test]
    fn test_snapshot_survives_reconfiguration() {
        let registry = Registry::new();
        registry.set_configuration(&json!({ "a": true })).unwrap();

        let snapshot = registry.snapshot();
        registry.set_configuration(&json!({})).unwrap();

        assert_eq!(snapshot.get_variant("ctx", "a").as_deref(), Some("on"));
        assert_eq!(registry.get_variant("ctx", "a"), None);
    }

    #[test]
    fn test_digest_keeps_configuration_order() {
        let registry = Registry::new();
        registry
            .set_configuration(&json!({ "z": true, "a": false, "m": true }))
            .unwrap();

        let digest = registry.get_variant_digest("ctx");
        let keys: Vec<&str> = digest.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let registry = Arc::new(Registry::new());
        registry.set_configuration(&json!({ "a": [ "x", "y" ] })).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_variant(&format!("ctx-{}", i), "a"))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_some());
        }
    }
}
