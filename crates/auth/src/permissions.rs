//! Permission vocabulary, capability bits and the per-actor permission matrix.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capability required by a request, derived from its HTTP method.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
    Delete,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Read, Action::Write, Action::Delete];

    /// Bit this action occupies in a permission bitmask.
    pub const fn bit(self) -> u32 {
        match self {
            Action::Read => 1,
            Action::Write => 2,
            Action::Delete => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("http method '{0}' does not map to an action")]
pub struct UnmappedMethodError(pub String);

/// Map an HTTP method to the action it requires.
///
/// Only the five upper-case verbs are recognized.
pub fn resolve_action(method: &str) -> Result<Action, UnmappedMethodError> {
    match method {
        "GET" => Ok(Action::Read),
        "POST" | "PUT" | "PATCH" => Ok(Action::Write),
        "DELETE" => Ok(Action::Delete),
        other => Err(UnmappedMethodError(other.to_string())),
    }
}

/// Named permission slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Dashboard,
    ReportPlayerActive,
    ReportClients,
    ReportSlot,
    ReportProfit,
    ReportClientShared,
    SuperAgent,
    Agent,
    GameProviders,
    Games,
    PlayerPendingTransaction,
    Settings,
    PermissionRegenerateSecret,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::Dashboard,
        Permission::ReportPlayerActive,
        Permission::ReportClients,
        Permission::ReportSlot,
        Permission::ReportProfit,
        Permission::ReportClientShared,
        Permission::SuperAgent,
        Permission::Agent,
        Permission::GameProviders,
        Permission::Games,
        Permission::PlayerPendingTransaction,
        Permission::Settings,
        Permission::PermissionRegenerateSecret,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::Dashboard => "dashboard",
            Permission::ReportPlayerActive => "report_player_active",
            Permission::ReportClients => "report_clients",
            Permission::ReportSlot => "report_slot",
            Permission::ReportProfit => "report_profit",
            Permission::ReportClientShared => "report_client_shared",
            Permission::SuperAgent => "super_agent",
            Permission::Agent => "agent",
            Permission::GameProviders => "game_providers",
            Permission::Games => "games",
            Permission::PlayerPendingTransaction => "player_pending_transaction",
            Permission::Settings => "settings",
            Permission::PermissionRegenerateSecret => "permission_regenerate_secret",
        }
    }

    /// Case-insensitive lookup of a raw name (surrounding whitespace ignored).
    ///
    /// Unknown names yield `None`; callers treat that as "no override".
    pub fn parse(raw: &str) -> Option<Permission> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granted capability bitmask per permission slot.
///
/// Each value is a union of [`Action::bit`]s; `0` grants nothing. Fields
/// missing from the token body default to `0`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionMatrix {
    pub dashboard: u32,
    pub report_player_active: u32,
    pub report_clients: u32,
    pub report_slot: u32,
    pub report_profit: u32,
    pub report_client_shared: u32,
    pub super_agent: u32,
    pub agent: u32,
    pub game_providers: u32,
    pub games: u32,
    pub player_pending_transaction: u32,
    pub settings: u32,
    pub permission_regenerate_secret: u32,
}

impl PermissionMatrix {
    pub fn value_of(&self, permission: Permission) -> u32 {
        match permission {
            Permission::Dashboard => self.dashboard,
            Permission::ReportPlayerActive => self.report_player_active,
            Permission::ReportClients => self.report_clients,
            Permission::ReportSlot => self.report_slot,
            Permission::ReportProfit => self.report_profit,
            Permission::ReportClientShared => self.report_client_shared,
            Permission::SuperAgent => self.super_agent,
            Permission::Agent => self.agent,
            Permission::GameProviders => self.game_providers,
            Permission::Games => self.games,
            Permission::PlayerPendingTransaction => self.player_pending_transaction,
            Permission::Settings => self.settings,
            Permission::PermissionRegenerateSecret => self.permission_regenerate_secret,
        }
    }

    pub fn grants(&self, permission: Permission, action: Action) -> bool {
        self.value_of(permission) & action.bit() != 0
    }

    /// Return a copy with `permission` set to `value`.
    pub fn with(mut self, permission: Permission, value: u32) -> Self {
        let slot = match permission {
            Permission::Dashboard => &mut self.dashboard,
            Permission::ReportPlayerActive => &mut self.report_player_active,
            Permission::ReportClients => &mut self.report_clients,
            Permission::ReportSlot => &mut self.report_slot,
            Permission::ReportProfit => &mut self.report_profit,
            Permission::ReportClientShared => &mut self.report_client_shared,
            Permission::SuperAgent => &mut self.super_agent,
            Permission::Agent => &mut self.agent,
            Permission::GameProviders => &mut self.game_providers,
            Permission::Games => &mut self.games,
            Permission::PlayerPendingTransaction => &mut self.player_pending_transaction,
            Permission::Settings => &mut self.settings,
            Permission::PermissionRegenerateSecret => &mut self.permission_regenerate_secret,
        };
        *slot = value;
        self
    }
}
