//! Request types that can expose a session id.

/// Anything that may carry a session id: an HTTP request, a websocket
/// connection, a job envelope.
pub trait SessionCarrier {
    fn session_id(&self) -> Option<&str>;
}

/// Minimal carrier holding an optional session id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    id: Option<String>,
}

impl SessionContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionCarrier for SessionContext {
    fn session_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl SessionCarrier for Option<String> {
    fn session_id(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl<T: SessionCarrier + ?Sized> SessionCarrier for &T {
    fn session_id(&self) -> Option<&str> {
        (**self).session_id()
    }
}
