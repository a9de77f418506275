// Tombola - deterministic feature flags and A/B variant assignment
//
// Every (context, feature) pair hashes to a stable roll, so the same user or
// session always sees the same variant without any stored assignment history.

// Re-export core functionality
pub use tombola_core::*;

// Logging controls and macros
pub use tombola_log as log;

// Re-exported for building configurations inline
pub use serde_json;

// Re-export optional crates
#[cfg(feature = "config")]
pub use tombola_config;

#[cfg(feature = "cache")]
pub use tombola_cache;

#[cfg(feature = "session")]
pub use tombola_session;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CoreError, CoreResult, CumulativeTable, Digest, FixedRoller, Override, Overrides,
        RawFeature, Registry, Roller, SaltStrategy, Sha256Roller,
    };

    #[cfg(feature = "config")]
    pub use tombola_config::{ConfigError, FeatureLoader, Settings, load_registry};

    #[cfg(feature = "cache")]
    pub use tombola_cache::{CachedOutcome, CachedRegistry, MemoryVariantCache, VariantCache};

    #[cfg(feature = "session")]
    pub use tombola_session::{SessionCarrier, SessionContext, SessionError, VariantGate};
}
