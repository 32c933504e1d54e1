//! Closed error taxonomy handed to the response layer.

use aggate_core::ApiError;
use serde::Serialize;
use thiserror::Error;

use crate::authorize::Decision;
use crate::permissions::UnmappedMethodError;
use crate::signature::SignatureError;
use crate::token::TokenError;

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("unmapped http method")]
    UnmappedMethod,

    #[error("signature missing")]
    SignatureMissing,

    #[error("signature malformed encoding")]
    SignatureMalformedEncoding,

    #[error("signature malformed payload")]
    SignatureMalformedPayload,

    #[error("signature expired")]
    SignatureExpired,

    #[error("signature from future")]
    SignatureFromFuture,

    #[error("signature hash mismatch")]
    SignatureHashMismatch,
}

impl ErrorKind {
    /// Map a decision to `Ok` (allowed) or [`ErrorKind::Forbidden`].
    pub fn from_decision(decision: &Decision) -> Result<(), ErrorKind> {
        if decision.allowed {
            Ok(())
        } else {
            Err(ErrorKind::Forbidden)
        }
    }

    /// Catalog record the response layer renders for this kind.
    pub fn api_error(self) -> ApiError {
        match self {
            ErrorKind::Unauthenticated => ApiError::UNAUTHORIZED,
            ErrorKind::Forbidden | ErrorKind::UnmappedMethod => ApiError::FORBIDDEN,
            ErrorKind::SignatureMissing => ApiError::MISSING_AGGREGATOR_SIGNATURE,
            ErrorKind::SignatureExpired => ApiError::SESSION_EXPIRED,
            ErrorKind::SignatureMalformedEncoding
            | ErrorKind::SignatureMalformedPayload
            | ErrorKind::SignatureFromFuture
            | ErrorKind::SignatureHashMismatch => ApiError::INVALID_SIGNATURE,
        }
    }
}

impl From<SignatureError> for ErrorKind {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::MalformedEncoding => ErrorKind::SignatureMalformedEncoding,
            SignatureError::MalformedPayload => ErrorKind::SignatureMalformedPayload,
            SignatureError::Expired { .. } => ErrorKind::SignatureExpired,
            SignatureError::FromFuture { .. } => ErrorKind::SignatureFromFuture,
            SignatureError::HashMismatch => ErrorKind::SignatureHashMismatch,
        }
    }
}

impl From<UnmappedMethodError> for ErrorKind {
    fn from(_: UnmappedMethodError) -> Self {
        ErrorKind::UnmappedMethod
    }
}

impl From<TokenError> for ErrorKind {
    fn from(_: TokenError) -> Self {
        ErrorKind::Unauthenticated
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        kind.api_error()
    }
}
