// Environment variable loading

use crate::{ConfigError, Result};
use std::env;
use std::path::Path;

/// Default prefix for every variable read by [`EnvLoader`].
pub const DEFAULT_PREFIX: &str = "TOMBOLA";

/// Reads `<PREFIX>_*` variables.
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full variable name for `key`, e.g. `overrides` -> `TOMBOLA_OVERRIDES`.
    pub fn var_name(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, key.to_uppercase())
        }
    }

    /// Value of `<PREFIX>_<KEY>`, `None` when unset or blank.
    pub fn var(&self, key: &str) -> Option<String> {
        env::var(self.var_name(key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    pub fn var_or(&self, key: &str, default: &str) -> String {
        self.var(key).unwrap_or_else(|| default.to_string())
    }

    /// Load a `.env` file into the process environment.
    ///
    /// With no path, a missing `.env` in the working directory is not an error.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe in edition 2024, so these tests stick to
    // names that are certainly unset.

    #[test]
    fn test_var_name() {
        assert_eq!(EnvLoader::default().var_name("overrides"), "TOMBOLA_OVERRIDES");
        assert_eq!(EnvLoader::new("APP").var_name("salt"), "APP_SALT");
        assert_eq!(EnvLoader::new("").var_name("path"), "PATH");
    }

    #[test]
    fn test_missing_var() {
        let loader = EnvLoader::new("TOMBOLA_TEST_MISSING_91823");
        assert_eq!(loader.var("overrides"), None);
        assert_eq!(loader.var_or("salt", "legacy"), "legacy");
    }

    #[test]
    fn test_load_dotenv_missing_file_errors() {
        let loader = EnvLoader::default();
        assert!(matches!(
            loader.load_dotenv(Some(Path::new("/nonexistent/tombola/.env"))),
            Err(ConfigError::LoadError(_))
        ));
        assert!(loader.load_dotenv(None).is_ok());
    }
}
