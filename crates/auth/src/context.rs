use std::sync::Arc;

use crate::claims::Claims;

/// Request-scoped user context (verified identity + the raw token it came from).
///
/// Immutable once built; clone freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    inner: Option<Arc<Authenticated>>,
}

#[derive(Debug, PartialEq, Eq)]
struct Authenticated {
    raw_token: String,
    claims: Claims,
}

impl UserContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(raw_token: impl Into<String>, claims: Claims) -> Self {
        Self {
            inner: Some(Arc::new(Authenticated {
                raw_token: raw_token.into(),
                claims,
            })),
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.inner.as_deref().map(|a| &a.claims)
    }

    pub fn raw_token(&self) -> Option<&str> {
        self.inner.as_deref().map(|a| a.raw_token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.is_some()
    }
}
