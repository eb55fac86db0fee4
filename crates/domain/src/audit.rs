use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by role profile use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role profile is activated.
    RoleProfileActivated,
    /// Emitted when a role profile is deactivated.
    RoleProfileDeactivated,
    /// Emitted when cosmetic role profile fields change.
    RoleProfileUpdated,
    /// Emitted when a drifted role cache is rebuilt from role profiles.
    RoleCacheReconciled,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleProfileActivated => "role_profile.activated",
            Self::RoleProfileDeactivated => "role_profile.deactivated",
            Self::RoleProfileUpdated => "role_profile.updated",
            Self::RoleCacheReconciled => "role_cache.reconciled",
        }
    }
}
