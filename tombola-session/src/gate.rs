//! Variant lookups bound to a request's session.

use crate::carrier::SessionCarrier;
use crate::error::{SessionError, SessionResult};
use std::sync::Arc;
use tombola_core::{Digest, Registry, Roller, Sha256Roller};
use tombola_log::debug;

/// Resolves variants using the session id of each request as the context.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use std::sync::Arc;
/// use tombola_core::Registry;
/// use tombola_session::{SessionContext, SessionError, VariantGate};
///
/// let registry = Arc::new(Registry::from_configuration(&json!({ "beta": true })).unwrap());
/// let gate = VariantGate::new(registry);
///
/// let request = SessionContext::new("sess-123");
/// assert_eq!(gate.variant(&request, "beta").unwrap().as_deref(), Some("on"));
///
/// let anonymous = SessionContext::anonymous();
/// assert_eq!(gate.variant(&anonymous, "beta"), Err(SessionError::SessionMissing));
/// ```
pub struct VariantGate<R: Roller = Sha256Roller> {
    registry: Arc<Registry<R>>,
}

impl<R: Roller> VariantGate<R> {
    pub fn new(registry: Arc<Registry<R>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry<R>> {
        &self.registry
    }

    /// The evaluation context for `request`.
    pub fn context<'a, C: SessionCarrier + ?Sized>(&self, request: &'a C) -> SessionResult<&'a str> {
        let id = request.session_id().ok_or(SessionError::SessionMissing)?;
        if id.trim().is_empty() {
            return Err(SessionError::InvalidSessionId(id.to_string()));
        }
        Ok(id)
    }

    pub fn variant<C: SessionCarrier + ?Sized>(
        &self,
        request: &C,
        feature: &str,
    ) -> SessionResult<Option<String>> {
        let context = self.context(request).inspect_err(|e| {
            debug!(target: "tombola::session", "cannot resolve {}: {}", feature, e);
        })?;
        Ok(self.registry.get_variant(context, feature))
    }

    /// Whether `feature` resolves to `variant` for this request.
    pub fn is_variant<C: SessionCarrier + ?Sized>(
        &self,
        request: &C,
        feature: &str,
        variant: &str,
    ) -> SessionResult<bool> {
        Ok(self.variant(request, feature)?.as_deref() == Some(variant))
    }

    pub fn digest<C: SessionCarrier + ?Sized>(&self, request: &C) -> SessionResult<Digest> {
        let context = self.context(request)?;
        Ok(self.registry.get_variant_digest(context))
    }
}

impl<R: Roller> Clone for VariantGate<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}
