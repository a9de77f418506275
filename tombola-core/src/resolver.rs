//! Variant resolution
//!
//! Inverse-CDF sampling over a [`CumulativeTable`]: roll a value for the
//! (context, feature) pair and take the first variant whose cumulative odds
//! exceed it. Tables whose outcome is already decided skip the roll.

use crate::roller::Roller;
use crate::table::{CumulativeTable, FULL_ODDS};
use serde::{Deserialize, Serialize};
use tombola_log::trace;

/// How the salt for a (context, feature) pair is assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaltStrategy {
    /// `"{context length}:{context}:{feature}"`. Distinct pairs never share
    /// a salt, even when the context contains `:`.
    #[default]
    LengthPrefixed,
    /// `"{context}:{feature}"`, matching assignments made by older
    /// deployments. `("a:b", "c")` and `("a", "b:c")` collide.
    Legacy,
}

impl SaltStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length-prefixed" | "length_prefixed" | "default" => Some(SaltStrategy::LengthPrefixed),
            "legacy" => Some(SaltStrategy::Legacy),
            _ => None,
        }
    }

    pub fn salt(&self, context: &str, feature: &str) -> String {
        match self {
            SaltStrategy::LengthPrefixed => format!("{}:{}:{}", context.len(), context, feature),
            SaltStrategy::Legacy => format!("{}:{}", context, feature),
        }
    }
}

/// Outcome of a resolution that did not need a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled<'a> {
    /// The first variant holds the whole probability mass.
    Winner(&'a str),
    /// Nothing can win: no variants, or every cumulative value is zero.
    NoWinner,
}

/// Decide the outcome of `table` without rolling, when possible.
pub fn settle(table: &CumulativeTable) -> Option<Settled<'_>> {
    let (first, first_odds) = match table.first() {
        Some(entry) => entry,
        None => return Some(Settled::NoWinner),
    };
    if first_odds >= FULL_ODDS {
        return Some(Settled::Winner(first));
    }
    if table.upper_bound() == 0.0 {
        return Some(Settled::NoWinner);
    }
    None
}

/// Resolve the winning variant of `feature` for `context`.
pub fn resolve<'t, R: Roller + ?Sized>(
    table: &'t CumulativeTable,
    context: &str,
    feature: &str,
    salt: SaltStrategy,
    roller: &R,
) -> Option<&'t str> {
    match settle(table) {
        Some(Settled::Winner(variant)) => return Some(variant),
        Some(Settled::NoWinner) => return None,
        None => {}
    }

    let roll = roller.roll(&salt.salt(context, feature));
    let winner = table.pick(roll);
    trace!(
        target: "tombola::resolver",
        "feature={} roll={:.6} variant={:?}",
        feature,
        roll,
        winner
    );
    winner
}
