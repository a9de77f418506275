//! Error types for session-bound lookups.

use thiserror::Error;

/// Result type for session-bound lookups.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The request carries no session, so there is no context to resolve for.
    #[error("No session attached to the request")]
    SessionMissing,

    /// The request carries a session id that cannot serve as a context.
    #[error("Invalid session ID: {0:?}")]
    InvalidSessionId(String),
}
