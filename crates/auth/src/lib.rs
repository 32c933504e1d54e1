//! `aggate-auth` — authorization decisions and service signature checks.
//!
//! This crate is intentionally decoupled from HTTP and storage: callers hand
//! in already-verified claims, the request method, the route's required
//! permissions and header/query values, and get back a decision or an
//! [`ErrorKind`].

pub mod authorize;
pub mod claims;
pub mod config;
pub mod context;
pub mod guard;
pub mod outcome;
pub mod permissions;
pub mod signature;
pub mod token;

pub use authorize::{
    AuthorizationExplanation, Decision, DecisionReason, PermissionCheck, authorize,
    explain_authorization, query_override,
};
pub use claims::{Claims, Role, SignatureClaims};
pub use config::{AuthConfig, ConfigError, signature_window_from_env};
pub use context::UserContext;
pub use guard::{AggregatorGuard, PermissionGuard, require_claims};
pub use outcome::ErrorKind;
pub use permissions::{Action, Permission, PermissionMatrix, UnmappedMethodError, resolve_action};
pub use signature::{
    SIGNATURE_HEADER, SignatureError, SignaturePayload, SignatureVerifier, SignatureWindow,
};
pub use token::{Hs256TokenVerifier, StaticTokenVerifier, TokenError, TokenVerifier, extract_bearer};
