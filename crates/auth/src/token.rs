//! Identity token verification seam.
//!
//! Signature and expiry checks of bearer tokens belong to `jsonwebtoken`;
//! this module only adapts it to the claims types of this crate. Verifiers
//! are constructed explicitly and injected (no process-wide state).

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token missing")]
    Missing,

    #[error("token malformed")]
    Malformed,

    #[error("token invalid: {0}")]
    Invalid(String),

    #[error("token has expired")]
    Expired,
}

/// Turns a raw bearer token into verified claims of type `C`.
pub trait TokenVerifier<C>: Send + Sync {
    fn verify(&self, token: &str) -> Result<C, TokenError>;
}

/// HS256 JWT verifier backed by a shared secret.
#[derive(Clone)]
pub struct Hs256TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256TokenVerifier {
    /// Audience is not checked unless [`with_audience`](Self::with_audience)
    /// is applied.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Require the token's `aud` claim to contain `audience`.
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    /// Allowed clock skew for `exp`/`nbf`, in seconds.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.validation.leeway = leeway_secs;
        self
    }
}

impl<C: DeserializeOwned> TokenVerifier<C> for Hs256TokenVerifier {
    fn verify(&self, token: &str) -> Result<C, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        jsonwebtoken::decode::<C>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::InvalidToken
                | JwtErrorKind::Base64(_)
                | JwtErrorKind::Json(_)
                | JwtErrorKind::Utf8(_) => TokenError::Malformed,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

/// Handshake token check for socket connections: the presented token must
/// equal a configured static secret.
pub struct StaticTokenVerifier {
    secret: String,
}

impl StaticTokenVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl TokenVerifier<()> for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<(), TokenError> {
        if token.is_empty() || self.secret.is_empty() {
            return Err(TokenError::Missing);
        }
        if bool::from(token.as_bytes().ct_eq(self.secret.as_bytes())) {
            Ok(())
        } else {
            Err(TokenError::Invalid("static token mismatch".to_string()))
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, TokenError> {
    let header = header.ok_or(TokenError::Missing)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(TokenError::Malformed)?
        .trim();
    if token.is_empty() {
        return Err(TokenError::Missing);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;
    use crate::claims::{Claims, Role, SignatureClaims};
    use crate::permissions::Permission;

    const SECRET: &[u8] = b"test-secret";

    fn mint(body: serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &body,
            &EncodingKey::from_secret(secret),
        )
        .expect("failed to encode jwt")
    }

    fn exp_in(minutes: i64) -> i64 {
        (Utc::now() + Duration::minutes(minutes)).timestamp()
    }

    #[test]
    fn verifies_identity_claims() {
        let token = mint(
            json!({
                "id": "u-1",
                "namespace": "tenant-a",
                "email": "u1@example.com",
                "position_type": "admin",
                "permissions": {"settings": 7},
                "exp": exp_in(10),
            }),
            SECRET,
        );

        let claims: Claims = Hs256TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.permissions.value_of(Permission::Settings), 7);
    }

    #[test]
    fn verifies_signature_claims() {
        let token = mint(json!({"client_id": "agg-1", "exp": exp_in(10)}), SECRET);
        let claims: SignatureClaims = Hs256TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.client_id, "agg-1");
    }

    #[test]
    fn audience_is_ignored_unless_configured() {
        let token = mint(
            json!({"client_id": "agg-1", "exp": exp_in(10), "aud": "aggregator"}),
            SECRET,
        );
        let claims: SignatureClaims = Hs256TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.client_id, "agg-1");
    }

    #[test]
    fn configured_audience_is_enforced() {
        let token = mint(
            json!({"client_id": "agg-1", "exp": exp_in(10), "aud": "aggregator"}),
            SECRET,
        );

        let ok: Result<SignatureClaims, _> = Hs256TokenVerifier::new(SECRET)
            .with_audience("aggregator")
            .verify(&token);
        assert!(ok.is_ok());

        let res: Result<SignatureClaims, _> = Hs256TokenVerifier::new(SECRET)
            .with_audience("backoffice")
            .verify(&token);
        assert!(matches!(res, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn leeway_extends_expiry() {
        let exp = (Utc::now() - Duration::seconds(90)).timestamp();
        let token = mint(json!({"client_id": "agg-1", "exp": exp}), SECRET);

        let strict: Result<SignatureClaims, _> =
            Hs256TokenVerifier::new(SECRET).with_leeway(0).verify(&token);
        assert_eq!(strict, Err(TokenError::Expired));

        let lenient: Result<SignatureClaims, _> =
            Hs256TokenVerifier::new(SECRET).with_leeway(300).verify(&token);
        assert!(lenient.is_ok());
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = mint(json!({"client_id": "agg-1", "exp": exp_in(10)}), b"other");
        let res: Result<SignatureClaims, _> = Hs256TokenVerifier::new(SECRET).verify(&token);
        assert!(matches!(res, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_reported() {
        let token = mint(json!({"client_id": "agg-1", "exp": exp_in(-10)}), SECRET);
        let res: Result<SignatureClaims, _> = Hs256TokenVerifier::new(SECRET).verify(&token);
        assert_eq!(res, Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        let res: Result<SignatureClaims, _> = Hs256TokenVerifier::new(SECRET).verify("abc");
        assert_eq!(res, Err(TokenError::Malformed));
    }

    #[test]
    fn static_token_compares_secret() {
        let v = StaticTokenVerifier::new("s3cret");
        assert_eq!(v.verify("s3cret"), Ok(()));
        assert!(matches!(v.verify("s3cre"), Err(TokenError::Invalid(_))));
        assert_eq!(v.verify(""), Err(TokenError::Missing));
        assert_eq!(StaticTokenVerifier::new("").verify("x"), Err(TokenError::Missing));
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer(Some("Bearer abc ")), Ok("abc"));
        assert_eq!(extract_bearer(Some("Basic abc")), Err(TokenError::Malformed));
        assert_eq!(extract_bearer(Some("Bearer   ")), Err(TokenError::Missing));
        assert_eq!(extract_bearer(None), Err(TokenError::Missing));
    }
}
