use serde::{Deserialize, Serialize};

use crate::permissions::PermissionMatrix;

/// Account class of the authenticated actor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
    User,
}

/// Identity token claims (transport-agnostic).
///
/// Produced once per request by a [`TokenVerifier`](crate::TokenVerifier)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,

    /// Tenant namespace the actor operates in.
    #[serde(default)]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_namespace: Option<String>,

    /// Super-agent id when an agent logs in on its behalf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default)]
    pub email: String,

    #[serde(rename = "position_type")]
    pub role: Role,

    #[serde(default)]
    pub permissions: PermissionMatrix,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// The user the request acts for: the super-agent when present, otherwise
    /// the token's own identity.
    pub fn acting_user_id(&self) -> &str {
        match self.user_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.id,
        }
    }
}

/// Claims of the service-to-service token presented on aggregator routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureClaims {
    #[serde(default)]
    pub client_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}
