//! Raw feature configuration and its normalization.
//!
//! A feature can be written three ways:
//!
//! ```json
//! {
//!     "new_checkout": true,
//!     "dark_mode": 25,
//!     "button_color": ["red", "green", "blue"],
//!     "pricing": { "control": 50, "discount": 30, "bundle": 20 }
//! }
//! ```
//!
//! Each shape is captured once by [`RawFeature`] and turned into a
//! [`CumulativeTable`] by [`RawFeature::normalize`], so resolution never has
//! to look at the original shape again.

use crate::table::{CumulativeTable, DEFAULT_VARIANT, FULL_ODDS};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Weight of a single variant before accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Odds {
    Flag(bool),
    Number(f64),
    /// Anything else found in a configuration (strings, null, nested data).
    Invalid(Value),
}

impl Odds {
    /// Weight contributed by this entry: booleans become 100/0, NaN,
    /// negatives and non-numeric values become 0.
    pub fn sanitize(&self) -> f64 {
        match self {
            Odds::Flag(true) => FULL_ODDS,
            Odds::Flag(false) => 0.0,
            Odds::Number(n) if n.is_nan() || *n < 0.0 => 0.0,
            Odds::Number(n) => *n,
            Odds::Invalid(_) => 0.0,
        }
    }
}

impl From<&Value> for Odds {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => Odds::Flag(*flag),
            Value::Number(n) => n
                .as_f64()
                .map(Odds::Number)
                .unwrap_or_else(|| Odds::Invalid(value.clone())),
            other => Odds::Invalid(other.clone()),
        }
    }
}

impl From<f64> for Odds {
    fn from(value: f64) -> Self {
        Odds::Number(value)
    }
}

impl From<bool> for Odds {
    fn from(value: bool) -> Self {
        Odds::Flag(value)
    }
}

/// A feature as it appears in configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFeature {
    /// A single implicit `on` variant with the given weight.
    Shorthand(Odds),
    /// Variant names sharing 100 equally, in list order.
    AutoDistributed(Vec<String>),
    /// Explicit variant weights, accumulated in insertion order.
    Weighted(IndexMap<String, Odds>),
}

impl RawFeature {
    pub fn enabled(on: bool) -> Self {
        RawFeature::Shorthand(Odds::Flag(on))
    }

    pub fn percentage(odds: f64) -> Self {
        RawFeature::Shorthand(Odds::Number(odds))
    }

    pub fn split<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawFeature::AutoDistributed(variants.into_iter().map(Into::into).collect())
    }

    pub fn weighted<I, S, O>(variants: I) -> Self
    where
        I: IntoIterator<Item = (S, O)>,
        S: Into<String>,
        O: Into<Odds>,
    {
        RawFeature::Weighted(
            variants
                .into_iter()
                .map(|(name, odds)| (name.into(), odds.into()))
                .collect(),
        )
    }

    /// Classify a JSON value. Arrays auto-distribute, objects are weighted,
    /// everything else is shorthand.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => RawFeature::AutoDistributed(items.iter().map(variant_name).collect()),
            Value::Object(map) => RawFeature::Weighted(
                map.iter()
                    .map(|(name, odds)| (name.clone(), Odds::from(odds)))
                    .collect(),
            ),
            scalar => RawFeature::Shorthand(Odds::from(scalar)),
        }
    }

    /// Build the cumulative odds table for this feature.
    pub fn normalize(&self) -> CumulativeTable {
        let mut table = CumulativeTable::new();

        match self {
            RawFeature::Shorthand(odds) => {
                table.push_weight(DEFAULT_VARIANT, odds.sanitize());
            }
            RawFeature::AutoDistributed(variants) => {
                if variants.is_empty() {
                    return table;
                }
                let share = FULL_ODDS / variants.len() as f64;
                for variant in variants {
                    table.push_weight(variant.as_str(), share);
                }
                // Float error must not leave a sliver below 100 unassigned.
                table.cover_tail();
            }
            RawFeature::Weighted(variants) => {
                for (variant, odds) in variants {
                    table.push_weight(variant.as_str(), odds.sanitize());
                }
            }
        }

        table
    }
}

impl From<&Value> for RawFeature {
    fn from(value: &Value) -> Self {
        RawFeature::from_value(value)
    }
}

impl From<bool> for RawFeature {
    fn from(on: bool) -> Self {
        RawFeature::enabled(on)
    }
}

impl From<f64> for RawFeature {
    fn from(odds: f64) -> Self {
        RawFeature::percentage(odds)
    }
}

/// Textual form of a variant listed in an array or given as an override.
pub(crate) fn variant_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
