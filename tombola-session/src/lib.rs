//! Session-bound variant lookups.
//!
//! Web handlers rarely have the evaluation context at hand; they have a
//! request with a session attached. [`VariantGate`] takes the context from
//! any [`SessionCarrier`] and fails with [`SessionError::SessionMissing`]
//! when the request has none, instead of silently resolving for an empty id.

pub mod carrier;
pub mod error;
pub mod gate;

pub use carrier::{SessionCarrier, SessionContext};
pub use error::{SessionError, SessionResult};
pub use gate::VariantGate;
