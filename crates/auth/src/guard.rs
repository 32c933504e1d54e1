//! Request-level guards.
//!
//! These are what an HTTP layer calls per route. They resolve the request's
//! inputs, run the engine or the signature protocol, log the outcome and
//! return an [`ErrorKind`] for the response layer on failure.

use crate::authorize::{Decision, authorize};
use crate::claims::{Claims, SignatureClaims};
use crate::outcome::ErrorKind;
use crate::permissions::{Permission, resolve_action};
use crate::signature::{SignaturePayload, SignatureVerifier};

/// Route guard that only requires an authenticated identity.
pub fn require_claims(claims: Option<&Claims>) -> Result<&Claims, ErrorKind> {
    claims.ok_or_else(|| {
        tracing::warn!("claims not present on request");
        ErrorKind::Unauthenticated
    })
}

/// Permission guard for one route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGuard {
    required: Vec<Permission>,
}

impl PermissionGuard {
    /// `required` is evaluated in the given order.
    pub fn new(required: impl Into<Vec<Permission>>) -> Self {
        Self {
            required: required.into(),
        }
    }

    pub fn required(&self) -> &[Permission] {
        &self.required
    }

    pub fn check(
        &self,
        claims: Option<&Claims>,
        method: &str,
        query_override: Option<&str>,
    ) -> Result<Decision, ErrorKind> {
        let claims = require_claims(claims)?;

        if let Ok(snapshot) = serde_json::to_string(&claims.permissions) {
            tracing::debug!(permissions = %snapshot, "permissions snapshot");
        }

        let action = resolve_action(method).map_err(|e| {
            tracing::warn!(method, error = %e, "method not mapped to action");
            ErrorKind::from(e)
        })?;

        let decision = authorize(claims, action, &self.required, query_override);
        let permission = decision.deciding_permission.map(Permission::as_str);

        if decision.allowed {
            tracing::info!(
                user_id = %claims.id,
                permission,
                action = %action,
                method,
                query = query_override,
                "permission granted"
            );
        } else {
            tracing::info!(
                user_id = %claims.id,
                permission,
                action = %action,
                method,
                query = query_override,
                reason = ?decision.reason,
                required = ?self.required,
                "permission denied"
            );
        }

        ErrorKind::from_decision(&decision).map(|()| decision)
    }
}

/// Guard for aggregator (service-to-service) routes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AggregatorGuard {
    verifier: SignatureVerifier,
}

impl AggregatorGuard {
    pub fn new(verifier: SignatureVerifier) -> Self {
        Self { verifier }
    }

    /// Check against the current wall clock.
    pub fn check(
        &self,
        signature_header: Option<&str>,
        claims: Option<&SignatureClaims>,
    ) -> Result<SignaturePayload, ErrorKind> {
        self.check_at(signature_header, claims, chrono::Utc::now().timestamp())
    }

    /// Header presence first, then the caller's identity, then the signature.
    pub fn check_at(
        &self,
        signature_header: Option<&str>,
        claims: Option<&SignatureClaims>,
        now: i64,
    ) -> Result<SignaturePayload, ErrorKind> {
        let signature = match signature_header {
            Some(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("aggregator signature header not found");
                return Err(ErrorKind::SignatureMissing);
            }
        };

        let Some(claims) = claims else {
            tracing::warn!("signature claims not present on request");
            return Err(ErrorKind::Unauthenticated);
        };
        if claims.client_id.is_empty() {
            tracing::warn!("client id not found in token claims");
            return Err(ErrorKind::Unauthenticated);
        }

        tracing::info!(client_id = %claims.client_id, "validating signature");

        self.verifier.verify_at(signature, now).map_err(|e| {
            tracing::warn!(client_id = %claims.client_id, error = %e, "signature validation failed");
            ErrorKind::from(e)
        })
    }
}
