//! Replay-protected HMAC signature carried in the `X-Aggregator-Signature`
//! header on service-to-service calls.
//!
//! The header holds `base64(json({"token", "timestamp", "hash"}))` where
//! `hash = base64(HMAC-SHA256(key = token, msg = token ++ decimal(timestamp)))`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Header that carries the signature blob.
pub const SIGNATURE_HEADER: &str = "X-Aggregator-Signature";

pub const DEFAULT_MAX_AGE_SECS: i64 = 5 * 60;
pub const DEFAULT_FUTURE_SKEW_SECS: i64 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature format: cannot decode base64")]
    MalformedEncoding,

    #[error("invalid signature payload")]
    MalformedPayload,

    #[error("signature expired: {age_secs} seconds old")]
    Expired { age_secs: i64 },

    #[error("invalid timestamp: {ahead_secs} seconds in the future")]
    FromFuture { ahead_secs: i64 },

    #[error("invalid signature: hash mismatch")]
    HashMismatch,
}

/// Decoded signature blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePayload {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub hash: String,
}

impl SignaturePayload {
    /// Build a payload whose hash is correct for `token` at `timestamp`.
    pub fn sign(token: impl Into<String>, timestamp: i64) -> Self {
        let token = token.into();
        let hash = expected_hash(&token, timestamp);
        Self {
            token,
            timestamp,
            hash,
        }
    }

    /// Encode as the header value.
    pub fn encode(&self) -> String {
        // Serializing a struct of strings and an integer cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        STANDARD.encode(json)
    }

    /// Decode a header value. Structural checks only; no freshness or hash.
    pub fn decode(blob: &str) -> Result<Self, SignatureError> {
        let json = STANDARD
            .decode(blob)
            .map_err(|_| SignatureError::MalformedEncoding)?;
        let payload: SignaturePayload =
            serde_json::from_slice(&json).map_err(|_| SignatureError::MalformedPayload)?;

        if payload.token.is_empty() || payload.timestamp == 0 || payload.hash.is_empty() {
            return Err(SignatureError::MalformedPayload);
        }
        Ok(payload)
    }
}

/// `base64(HMAC-SHA256(key = token, msg = token ++ decimal(timestamp)))`.
pub fn expected_hash(token: &str, timestamp: i64) -> String {
    // HMAC accepts keys of any length, so this never errors.
    let mut mac = match Hmac::<Sha256>::new_from_slice(token.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(token.as_bytes());
    mac.update(timestamp.to_string().as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Accepted age range of a signature relative to server time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignatureWindow {
    /// Oldest accepted signature, in seconds.
    pub max_age_secs: i64,
    /// How far ahead of server time a timestamp may be, in seconds.
    pub future_skew_secs: i64,
}

impl Default for SignatureWindow {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            future_skew_secs: DEFAULT_FUTURE_SKEW_SECS,
        }
    }
}

/// Verifies signature blobs against a [`SignatureWindow`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SignatureVerifier {
    window: SignatureWindow,
}

impl SignatureVerifier {
    pub fn new(window: SignatureWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> SignatureWindow {
        self.window
    }

    /// Verify against the current wall clock (read once).
    pub fn verify(&self, blob: &str) -> Result<SignaturePayload, SignatureError> {
        self.verify_at(blob, Utc::now().timestamp())
    }

    /// Verify against an explicit server time in UTC seconds.
    ///
    /// Checks run in order: encoding, payload shape, age, future skew, hash.
    pub fn verify_at(&self, blob: &str, now: i64) -> Result<SignaturePayload, SignatureError> {
        let payload = SignaturePayload::decode(blob)?;

        let age = now.saturating_sub(payload.timestamp);
        if age > self.window.max_age_secs {
            return Err(SignatureError::Expired { age_secs: age });
        }
        if payload.timestamp > now.saturating_add(self.window.future_skew_secs) {
            return Err(SignatureError::FromFuture { ahead_secs: -age });
        }

        let expected = expected_hash(&payload.token, payload.timestamp);
        if !bool::from(payload.hash.as_bytes().ct_eq(expected.as_bytes())) {
            return Err(SignatureError::HashMismatch);
        }

        Ok(payload)
    }
}
