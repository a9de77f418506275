//! Cumulative odds tables.

use indexmap::IndexMap;
use serde::Serialize;

/// Variant name given to shorthand features and bare overrides.
pub const DEFAULT_VARIANT: &str = "on";

/// Total probability mass. A cumulative value at or above this always wins.
pub const FULL_ODDS: f64 = 100.0;

/// Ordered mapping from variant name to the running total of odds.
///
/// Entries keep insertion order and their cumulative values never decrease,
/// which lets resolution walk the table once and stop at the first entry
/// above the roll. Values are never negative.
///
/// Tables are only built by normalizing a feature, so there is no
/// `Deserialize`. Read raw configuration with
/// [`RawFeature::from_value`](crate::RawFeature::from_value) instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CumulativeTable {
    entries: IndexMap<String, f64>,
}

impl CumulativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table where `variant` wins every roll.
    pub fn forced(variant: impl Into<String>) -> Self {
        let mut table = Self::new();
        table.entries.insert(variant.into(), FULL_ODDS);
        table
    }

    /// Append the next variant with its own (already sanitized) weight.
    ///
    /// A name that is already present keeps its position and absorbs the
    /// weight, so cumulative values stay non-decreasing.
    pub(crate) fn push_weight(&mut self, variant: impl Into<String>, weight: f64) {
        let total = self.upper_bound() + weight.max(0.0);
        let variant = variant.into();
        match self.entries.get_index_of(&variant) {
            Some(index) => {
                // Shift this entry and everything after it by the new weight.
                for (_, cumulative) in self.entries.iter_mut().skip(index) {
                    *cumulative += weight.max(0.0);
                }
            }
            None => {
                self.entries.insert(variant, total);
            }
        }
    }

    /// Pin the last entry to exactly [`FULL_ODDS`].
    pub(crate) fn cover_tail(&mut self) {
        if let Some((_, cumulative)) = self.entries.last_mut() {
            *cumulative = FULL_ODDS;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cumulative value of `variant`, if configured.
    pub fn get(&self, variant: &str) -> Option<f64> {
        self.entries.get(variant).copied()
    }

    pub fn first(&self) -> Option<(&str, f64)> {
        self.entries.first().map(|(name, odds)| (name.as_str(), *odds))
    }

    pub fn last(&self) -> Option<(&str, f64)> {
        self.entries.last().map(|(name, odds)| (name.as_str(), *odds))
    }

    /// Cumulative value of the last entry, `0` for an empty table.
    pub fn upper_bound(&self) -> f64 {
        self.last().map(|(_, odds)| odds).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, odds)| (name.as_str(), *odds))
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Pick the first variant whose cumulative value is strictly above `roll`.
    pub fn pick(&self, roll: f64) -> Option<&str> {
        self.iter()
            .find(|(_, cumulative)| *cumulative > roll)
            .map(|(name, _)| name)
    }
}
