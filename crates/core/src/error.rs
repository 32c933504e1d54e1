//! Error catalog.
//!
//! Every failure that reaches a client is one of these records. The HTTP
//! status, the numeric business code and the message travel together so the
//! response layer never has to invent text.

use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

/// A client-facing error record.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ApiError {
    #[serde(skip)]
    pub http_status: u16,
    pub code: u32,
    pub message: Cow<'static, str>,
}

impl ApiError {
    pub fn new(http_status: u16, code: u32, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            http_status,
            code,
            message: message.into(),
        }
    }

    const fn fixed(http_status: u16, code: u32, message: &'static str) -> Self {
        Self {
            http_status,
            code,
            message: Cow::Borrowed(message),
        }
    }

    // 400
    pub const INSUFFICIENT_BALANCE: ApiError = ApiError::fixed(
        400,
        4001001,
        "The player does not have sufficient balance to complete this transaction",
    );
    pub const INVALID_BONUS: ApiError =
        ApiError::fixed(400, 4001002, "The bonus provided is invalid or no longer available");
    pub const EMPTY_CLIENT_ID: ApiError =
        ApiError::fixed(400, 4001003, "Client ID is missing. Please provide a valid Client ID");
    pub const INVALID_CLIENT_SECRET: ApiError =
        ApiError::fixed(400, 4001004, "The provided client secret is invalid");
    pub const GAME_INACTIVE: ApiError =
        ApiError::fixed(400, 4001005, "The selected game is currently inactive");
    pub const INVALID_SIGNATURE: ApiError = ApiError::fixed(
        400,
        4001006,
        "The request signature is invalid. Please check your credentials",
    );
    pub const MISSING_AGGREGATOR_SIGNATURE: ApiError = ApiError::fixed(
        400,
        4002001,
        "Missing X-Aggregator-Signature header. Please provide a valid signature",
    );

    // 401
    pub const UNAUTHORIZED: ApiError =
        ApiError::fixed(401, 4010001, "You are not authorized to access this resource");
    pub const INVALID_TOKEN: ApiError =
        ApiError::fixed(401, 4010002, "The provided access token is invalid");
    pub const MISSING_AUTHORIZATION: ApiError =
        ApiError::fixed(401, 4010003, "Authorization header is missing");
    pub const EXPIRED_TOKEN: ApiError =
        ApiError::fixed(401, 4010004, "The access token has expired. Please login again");

    // 403
    pub const FORBIDDEN: ApiError =
        ApiError::fixed(403, 4030001, "You do not have permission to access this resource");
    pub const SESSION_EXPIRED: ApiError = ApiError::fixed(403, 4031001, "Your session has expired");

    // 404 / 409
    pub const PROVIDER_NOT_FOUND: ApiError =
        ApiError::fixed(404, 4041001, "The specified game provider could not be found");
    pub const SESSION_NOT_FOUND: ApiError = ApiError::fixed(
        404,
        4041002,
        "The session you are trying to access does not exist or is invalid",
    );
    pub const PLAYER_NOT_FOUND: ApiError =
        ApiError::fixed(404, 4041003, "The requested player could not be found.");
    pub const GAME_NOT_FOUND: ApiError =
        ApiError::fixed(404, 4041004, "The requested game could not be found");
    pub const DUPLICATE_TRANSACTION: ApiError =
        ApiError::fixed(409, 4091001, "This transaction has already been processed");

    // 5xx
    pub const SERVER_ERROR: ApiError = ApiError::fixed(
        500,
        5000001,
        "An unexpected server error occurred. Please try again later.",
    );

    /// A specific record could not be found.
    pub fn record_not_found(entity: &str, id: &str) -> Self {
        Self::new(
            404,
            4042999,
            format!("The specified {entity} with ID '{id}' could not be found"),
        )
    }

    /// Request input failed validation.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(400, 4002999, message)
    }
}
