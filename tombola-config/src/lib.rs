// Feature configuration loading for Tombola

pub mod env;
pub mod error;
pub mod loader;

pub use env::{DEFAULT_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{FeatureLoader, FileFormat};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tombola_core::{Registry, Roller, SaltStrategy};
use tombola_log::{debug, info};

/// Where features and overrides come from, and how salts are built.
///
/// # Examples
///
/// ```no_run
/// use tombola_config::Settings;
///
/// // TOMBOLA_FEATURES_FILE=features.toml TOMBOLA_OVERRIDES=new_checkout
/// let registry = Settings::from_env()?.build_registry()?;
/// # Ok::<(), tombola_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON or TOML file holding the feature mapping.
    pub features_file: Option<PathBuf>,
    /// Override directives, JSON or `name[:variant],...`.
    pub overrides: Option<String>,
    pub salt: SaltStrategy,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.features_file = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: impl Into<String>) -> Self {
        self.overrides = Some(overrides.into());
        self
    }

    pub fn with_salt(mut self, salt: SaltStrategy) -> Self {
        self.salt = salt;
        self
    }

    /// Read `TOMBOLA_FEATURES_FILE`, `TOMBOLA_OVERRIDES` and `TOMBOLA_SALT`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_loader(&EnvLoader::default())
    }

    pub fn from_env_loader(loader: &EnvLoader) -> Result<Self> {
        let salt = match loader.var("salt") {
            Some(raw) => SaltStrategy::parse(&raw).ok_or_else(|| {
                ConfigError::ParseError(format!(
                    "{}: unknown salt strategy {:?}",
                    loader.var_name("salt"),
                    raw
                ))
            })?,
            None => SaltStrategy::default(),
        };

        Ok(Self {
            features_file: loader.var("features_file").map(PathBuf::from),
            overrides: loader.var("overrides"),
            salt,
        })
    }

    /// Load the features file (if any) into `registry`, then apply overrides.
    ///
    /// The salt strategy is fixed at registry construction and is not
    /// touched here. A failure while loading leaves `registry` unchanged.
    pub fn apply<R: Roller>(&self, registry: &Registry<R>) -> Result<()> {
        if let Some(path) = &self.features_file {
            let raw = FeatureLoader::auto(path)?.load_file(path)?;
            registry.set_configuration(&raw)?;
            info!(
                target: "tombola::config",
                "loaded {} features from {}",
                registry.len(),
                path.display()
            );
        }

        if let Some(overrides) = &self.overrides {
            debug!(target: "tombola::config", "applying overrides {:?}", overrides);
            registry.apply_overrides(overrides.as_str());
        }

        Ok(())
    }

    /// Build a fresh SHA-256 registry from these settings.
    pub fn build_registry(&self) -> Result<Registry> {
        let registry = Registry::new().with_salt(self.salt);
        self.apply(&registry)?;
        Ok(registry)
    }
}

/// Build a registry from a single JSON or TOML feature file.
pub fn load_registry(path: impl AsRef<Path>) -> Result<Registry> {
    Settings::new()
        .with_features_file(path.as_ref())
        .build_registry()
}
