//! Override directives
//!
//! Overrides pin a feature to one variant for every context. They arrive as
//! structured data, a JSON string, or the compact grammar
//! `name[:variant],name[:variant],...` where a bare name forces `on`:
//!
//! ```
//! use tombola_core::{Override, Overrides};
//!
//! let overrides = Overrides::parse("new_checkout,button_color:green");
//! assert_eq!(overrides.get("new_checkout"), Some(&Override::Force("on".into())));
//! assert_eq!(overrides.get("button_color"), Some(&Override::Force("green".into())));
//! ```
//!
//! Parsing never fails. Input that is neither a JSON object nor usable
//! compact syntax yields fewer (possibly zero) directives.

use crate::feature::variant_name;
use crate::table::{CumulativeTable, DEFAULT_VARIANT};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tombola_log::warn;

/// What an override does to one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    /// The named variant wins with 100% weight.
    Force(String),
    /// The feature resolves to no variant.
    Disable,
}

impl Override {
    /// Coerce one override value: `true`, `null` and `""` force `on`,
    /// `false` disables, strings name the variant, anything else is used
    /// by its JSON text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(false) => Override::Disable,
            Value::Bool(true) | Value::Null => Override::Force(DEFAULT_VARIANT.to_string()),
            Value::String(s) if s.is_empty() => Override::Force(DEFAULT_VARIANT.to_string()),
            other => Override::Force(variant_name(other)),
        }
    }

    /// The table that replaces the feature's configured one.
    pub fn table(&self) -> CumulativeTable {
        match self {
            Override::Force(variant) => CumulativeTable::forced(variant.as_str()),
            Override::Disable => CumulativeTable::new(),
        }
    }
}

/// Parsed override directives, keyed by feature name in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    directives: IndexMap<String, Override>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force(mut self, feature: impl Into<String>, variant: impl Into<String>) -> Self {
        self.directives
            .insert(feature.into(), Override::Force(variant.into()));
        self
    }

    pub fn disable(mut self, feature: impl Into<String>) -> Self {
        self.directives.insert(feature.into(), Override::Disable);
        self
    }

    /// Parse a JSON object string, falling back to the compact grammar when
    /// the text is not valid JSON.
    pub fn parse(input: &str) -> Self {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::parse_compact(input),
        }
    }

    /// Parse `name[:variant]` tokens separated by commas.
    ///
    /// Blank tokens are skipped. Anything after a second `:` is ignored.
    pub fn parse_compact(input: &str) -> Self {
        let mut overrides = Self::new();

        for token in input.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let mut parts = token.split(':');
            let feature = parts.next().unwrap_or_default().trim();
            if feature.is_empty() {
                warn!(target: "tombola::overrides", "skipping override without a feature name: {:?}", token);
                continue;
            }

            let variant = parts
                .next()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_VARIANT);

            overrides
                .directives
                .insert(feature.to_string(), Override::Force(variant.to_string()));
        }

        overrides
    }

    /// Read overrides from structured data. Only objects carry directives.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            Value::Null => Self::new(),
            other => {
                warn!(
                    target: "tombola::overrides",
                    "ignoring non-mapping overrides: {}",
                    other
                );
                Self::new()
            }
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            directives: map
                .iter()
                .map(|(feature, value)| (feature.clone(), Override::from_value(value)))
                .collect(),
        }
    }

    pub fn get(&self, feature: &str) -> Option<&Override> {
        self.directives.get(feature)
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Override)> {
        self.directives.iter().map(|(name, o)| (name.as_str(), o))
    }

    /// Merge `other` on top of these directives.
    pub fn extend(&mut self, other: Overrides) {
        self.directives.extend(other.directives);
    }
}

impl From<&str> for Overrides {
    fn from(input: &str) -> Self {
        Overrides::parse(input)
    }
}

impl From<String> for Overrides {
    fn from(input: String) -> Self {
        Overrides::parse(&input)
    }
}

impl From<&String> for Overrides {
    fn from(input: &String) -> Self {
        Overrides::parse(input)
    }
}

impl From<Value> for Overrides {
    fn from(value: Value) -> Self {
        Overrides::from_value(&value)
    }
}

impl From<&Value> for Overrides {
    fn from(value: &Value) -> Self {
        Overrides::from_value(value)
    }
}

impl From<Map<String, Value>> for Overrides {
    fn from(map: Map<String, Value>) -> Self {
        Overrides::from_map(&map)
    }
}

impl<K, V> FromIterator<(K, V)> for Overrides
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Overrides::new(), |acc, (feature, variant)| acc.force(feature, variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forced(name: &str) -> Override {
        Override::Force(name.to_string())
    }

    #[test]
    fn test_compact_grammar() {
        let overrides = Overrides::parse("featureA,featureB:variantX");
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("featureA"), Some(&forced("on")));
        assert_eq!(overrides.get("featureB"), Some(&forced("variantX")));
    }

    #[test]
    fn test_compact_grammar_is_permissive() {
        let overrides = Overrides::parse(" a , ,b:, :c, d:x:y ");
        assert_eq!(overrides.get("a"), Some(&forced("on")));
        assert_eq!(overrides.get("b"), Some(&forced("on")));
        assert_eq!(overrides.get("d"), Some(&forced("x")));
        assert_eq!(overrides.len(), 3);
    }

    #[test]
    fn test_json_string() {
        let overrides = Overrides::parse(r#"{"featureA":"variantX","featureB":true,"featureC":false}"#);
        assert_eq!(overrides.get("featureA"), Some(&forced("variantX")));
        assert_eq!(overrides.get("featureB"), Some(&forced("on")));
        assert_eq!(overrides.get("featureC"), Some(&Override::Disable));
    }

    #[test]
    fn test_json_non_object_is_no_override() {
        assert!(Overrides::parse("42").is_empty());
        assert!(Overrides::parse("[\"a\"]").is_empty());
        assert!(Overrides::from_value(&json!("featureA")).is_empty());
    }

    #[test]
    fn test_broken_json_falls_back_to_compact() {
        let overrides = Overrides::parse("{\"a\":");
        assert_eq!(overrides.get("{\"a\""), Some(&forced("on")));
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(Override::from_value(&json!(null)), forced("on"));
        assert_eq!(Override::from_value(&json!("")), forced("on"));
        assert_eq!(Override::from_value(&json!(2)), forced("2"));
        assert_eq!(Override::from_value(&json!(false)), Override::Disable);
    }

    #[test]
    fn test_tables() {
        assert_eq!(forced("x").table(), CumulativeTable::forced("x"));
        assert!(Override::Disable.table().is_empty());
    }

    #[test]
    fn test_builders_and_extend() {
        let mut base = Overrides::new().force("a", "x").disable("b");
        base.extend([("b", "y")].into_iter().collect());
        assert_eq!(base.get("a"), Some(&forced("x")));
        assert_eq!(base.get("b"), Some(&forced("y")));
    }
}
