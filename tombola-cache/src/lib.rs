//! Memoization for Tombola variant resolution.
//!
//! Resolution is a pure function of (configuration, context, feature), so
//! caching is optional: it trades memory for skipping a SHA-256 per lookup.
//! [`CachedRegistry`] wraps a shared [`tombola_core::Registry`] and drops its
//! cache whenever the registry is reconfigured or overridden.

pub mod cached;
pub mod memory;
pub mod traits;

pub use cached::{CacheStats, CachedRegistry};
pub use memory::{DEFAULT_CAPACITY, MemoryVariantCache};
pub use traits::{CachedOutcome, VariantCache};
