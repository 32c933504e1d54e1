use serde::Serialize;

use crate::claims::Claims;
use crate::permissions::{Action, Permission};

/// Why a [`Decision`] came out the way it did.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// The query override named a permission whose bitmask covers the action.
    OverrideGranted,
    /// The query override named a permission whose bitmask lacks the action.
    OverrideInsufficient,
    /// The query override named a permission the route does not accept.
    OverrideOutsideRequired,
    /// The route declares no required permissions.
    Unrestricted,
    /// A required permission covers the action.
    Granted,
    /// None of the required permissions cover the action.
    NoPermissionSatisfied,
}

/// Outcome of one authorization check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    /// The permission that decided the outcome, if any was consulted.
    pub deciding_permission: Option<Permission>,
    pub action: Action,
    pub reason: DecisionReason,
}

impl Decision {
    fn new(
        allowed: bool,
        deciding_permission: Option<Permission>,
        action: Action,
        reason: DecisionReason,
    ) -> Self {
        Self {
            allowed,
            deciding_permission,
            action,
            reason,
        }
    }
}

/// Pick the raw override value from the request query: `role` wins when
/// non-empty, otherwise `type`.
pub fn query_override<'a>(role: Option<&'a str>, kind: Option<&'a str>) -> Option<&'a str> {
    match role {
        Some(r) if !r.is_empty() => Some(r),
        _ => kind.filter(|k| !k.is_empty()),
    }
}

/// Decide whether `claims` may perform `action` on a route requiring any of
/// `required`.
///
/// - No IO
/// - No panics
/// - Never fails: every denial is a returned [`Decision`]
///
/// A recognised `query_override` is authoritative: it must belong to
/// `required` (when non-empty) and its own bitmask alone decides. Otherwise an
/// empty `required` allows, and a non-empty one allows on the first entry (in
/// the given order) whose bitmask covers the action.
pub fn authorize(
    claims: &Claims,
    action: Action,
    required: &[Permission],
    query_override: Option<&str>,
) -> Decision {
    evaluate(claims, action, required, query_override, |_| {})
}

fn evaluate(
    claims: &Claims,
    action: Action,
    required: &[Permission],
    query_override: Option<&str>,
    mut on_check: impl FnMut(PermissionCheck),
) -> Decision {
    let mut check = |permission: Permission| {
        let granted = claims.permissions.value_of(permission);
        let satisfied = granted & action.bit() != 0;
        on_check(PermissionCheck {
            permission,
            granted,
            satisfied,
        });
        satisfied
    };

    if let Some(p) = query_override.and_then(Permission::parse) {
        if !required.is_empty() && !required.contains(&p) {
            return Decision::new(false, Some(p), action, DecisionReason::OverrideOutsideRequired);
        }
        return if check(p) {
            Decision::new(true, Some(p), action, DecisionReason::OverrideGranted)
        } else {
            Decision::new(false, Some(p), action, DecisionReason::OverrideInsufficient)
        };
    }

    if required.is_empty() {
        return Decision::new(true, None, action, DecisionReason::Unrestricted);
    }

    match required.iter().copied().find(|p| check(*p)) {
        Some(p) => Decision::new(true, Some(p), action, DecisionReason::Granted),
        None => Decision::new(false, None, action, DecisionReason::NoPermissionSatisfied),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// One permission consulted while reaching a decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionCheck {
    pub permission: Permission,
    /// The actor's bitmask for this permission.
    pub granted: u32,
    pub satisfied: bool,
}

/// Detailed, auditable account of an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    pub decision: Decision,
    /// The override permission, when the query named a known one.
    pub override_permission: Option<Permission>,
    pub required: Vec<Permission>,
    /// Permissions consulted, in evaluation order.
    pub checked: Vec<PermissionCheck>,
}

/// Explain why an authorization decision was made (or would be made).
///
/// Evaluates exactly like [`authorize`] while recording every permission
/// bitmask it looked at.
pub fn explain_authorization(
    claims: &Claims,
    action: Action,
    required: &[Permission],
    query_override: Option<&str>,
) -> AuthorizationExplanation {
    let mut checked = Vec::new();
    let decision = evaluate(claims, action, required, query_override, |c| checked.push(c));

    AuthorizationExplanation {
        decision,
        override_permission: query_override.and_then(Permission::parse),
        required: required.to_vec(),
        checked,
    }
}
