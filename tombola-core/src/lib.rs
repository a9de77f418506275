//! Deterministic variant assignment
//!
//! Given a feature with weighted variants and an opaque context string (a
//! session or user id), pick the variant that context gets. The choice is a
//! pure function of the configuration, the context and the feature name, so
//! the same context always lands on the same variant without storing
//! assignments anywhere.
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use tombola_core::Registry;
//!
//! let registry = Registry::new();
//! registry.set_configuration(&json!({
//!     "new_search": 100,
//!     "pricing": { "control": 50, "discount": 50 },
//! }))?;
//!
//! let variant = registry.get_variant("session-42", "pricing");
//! assert!(matches!(variant.as_deref(), Some("control") | Some("discount")));
//!
//! // Same context, same answer.
//! assert_eq!(variant, registry.get_variant("session-42", "pricing"));
//!
//! let digest = registry.get_variant_digest("session-42");
//! assert_eq!(digest["new_search"].as_deref(), Some("on"));
//! # Ok::<(), tombola_core::CoreError>(())
//! ```
//!
//! # Configuration shapes
//!
//! - `true` / `false` / a number: a single `on` variant with that weight
//! - `["a", "b", "c"]`: equal shares, the last variant covers any rounding gap
//! - `{"a": 20, "b": 30}`: explicit weights, accumulated in order
//!
//! # Overrides
//!
//! [`Registry::apply_overrides`] pins features to a variant for everyone.
//! See [`overrides`] for the accepted formats.

pub mod error;
pub mod feature;
pub mod overrides;
pub mod registry;
pub mod resolver;
pub mod roller;
pub mod table;

pub use error::{CoreError, CoreResult};
pub use feature::{Odds, RawFeature};
pub use overrides::{Override, Overrides};
pub use registry::{Digest, FeatureMap, Registry, Snapshot};
pub use resolver::{SaltStrategy, Settled, resolve, settle};
pub use roller::{FixedRoller, Roller, Sha256Roller, int_from_salt, roll, roll_int, roll_u32};
pub use table::{CumulativeTable, DEFAULT_VARIANT, FULL_ODDS};
