//! Environment-driven configuration.

use std::env;

use thiserror::Error;

use crate::signature::{DEFAULT_FUTURE_SKEW_SECS, DEFAULT_MAX_AGE_SECS, SignatureWindow};
use crate::token::Hs256TokenVerifier;

pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_JWT_AUDIENCE: &str = "JWT_AUDIENCE";
pub const ENV_STATIC_SECRET: &str = "STATIC_SECRET";
pub const ENV_SIGNATURE_MAX_AGE: &str = "SIGNATURE_MAX_AGE_SECS";
pub const ENV_SIGNATURE_FUTURE_SKEW: &str = "SIGNATURE_FUTURE_SKEW_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: '{value}' (expected a non-negative integer)")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// HS256 secret for identity tokens.
    pub token_secret: String,
    /// Required `aud` for identity tokens; unchecked when absent.
    pub token_audience: Option<String>,
    /// Static secret for socket handshakes, when enabled.
    pub static_secret: Option<String>,
    pub signature_window: SignatureWindow,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret = lookup(ENV_JWT_SECRET)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;
        let token_audience = lookup(ENV_JWT_AUDIENCE).filter(|s| !s.is_empty());
        let static_secret = lookup(ENV_STATIC_SECRET).filter(|s| !s.is_empty());
        let signature_window = signature_window_from_lookup(&lookup)?;

        Ok(Self {
            token_secret,
            token_audience,
            static_secret,
            signature_window,
        })
    }

    /// Identity token verifier for this configuration.
    pub fn token_verifier(&self) -> Hs256TokenVerifier {
        let verifier = Hs256TokenVerifier::new(self.token_secret.as_bytes());
        match self.token_audience.as_deref() {
            Some(aud) => verifier.with_audience(aud),
            None => verifier,
        }
    }
}

/// Signature window alone, for tools that never see identity tokens.
pub fn signature_window_from_env() -> Result<SignatureWindow, ConfigError> {
    signature_window_from_lookup(&|key: &str| env::var(key).ok())
}

pub fn signature_window_from_lookup<F>(lookup: &F) -> Result<SignatureWindow, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(SignatureWindow {
        max_age_secs: seconds(lookup, ENV_SIGNATURE_MAX_AGE, DEFAULT_MAX_AGE_SECS)?,
        future_skew_secs: seconds(lookup, ENV_SIGNATURE_FUTURE_SKEW, DEFAULT_FUTURE_SKEW_SECS)?,
    })
}

fn seconds<F>(lookup: &F, name: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(v) if v >= 0 => Ok(v),
            _ => Err(ConfigError::InvalidNumber { name, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_window() {
        let cfg = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap();
        assert_eq!(cfg.signature_window, SignatureWindow::default());
        assert_eq!(cfg.static_secret, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("STATIC_SECRET", "sock"),
            ("SIGNATURE_MAX_AGE_SECS", "120"),
            ("SIGNATURE_FUTURE_SKEW_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(cfg.static_secret.as_deref(), Some("sock"));
        assert_eq!(cfg.signature_window.max_age_secs, 120);
        assert_eq!(cfg.signature_window.future_skew_secs, 5);
    }

    #[test]
    fn window_loads_without_jwt_secret() {
        let window =
            signature_window_from_lookup(&lookup(&[("SIGNATURE_MAX_AGE_SECS", "30")])).unwrap();
        assert_eq!(window.max_age_secs, 30);
        assert_eq!(window.future_skew_secs, 60);
    }

    #[test]
    fn token_verifier_applies_configured_audience() {
        use chrono::{Duration, Utc};
        use jsonwebtoken::{Algorithm, EncodingKey, Header};

        use crate::claims::SignatureClaims;
        use crate::token::{TokenError, TokenVerifier};

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({
                "client_id": "agg-1",
                "aud": "aggregator",
                "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
            }),
            &EncodingKey::from_secret(b"s"),
        )
        .unwrap();

        let open = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap();
        let res: Result<SignatureClaims, _> = open.token_verifier().verify(&token);
        assert!(res.is_ok());

        let pinned = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("JWT_AUDIENCE", "backoffice"),
        ]))
        .unwrap();
        assert_eq!(pinned.token_audience.as_deref(), Some("backoffice"));
        let res: Result<SignatureClaims, _> = pinned.token_verifier().verify(&token);
        assert!(matches!(res, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn jwt_secret_is_required() {
        assert_eq!(
            AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "")])),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn rejects_negative_or_garbage_window() {
        for bad in ["-1", "five", ""] {
            let res = AuthConfig::from_lookup(lookup(&[
                ("JWT_SECRET", "s"),
                ("SIGNATURE_MAX_AGE_SECS", bad),
            ]));
            assert!(matches!(res, Err(ConfigError::InvalidNumber { .. })), "{bad}");
        }
    }
}
