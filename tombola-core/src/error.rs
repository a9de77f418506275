//! Error types for variant resolution.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the roller and the registry.
///
/// Unknown features and empty variant tables are not errors; they resolve
/// to `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The raw configuration handed to the registry was not a mapping.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The integer entry point of the roller received a non-numeric value.
    #[error("Invalid roll input: {0}")]
    InvalidRollInput(String),
}
