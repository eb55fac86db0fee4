use reelhub_domain::{AuditAction, RoleType, UserId};

/// Immutable audit event appended inside a role profile unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAuditEvent {
    /// User whose roles changed.
    pub user_id: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Role type the transition targeted, if any.
    pub role_type: Option<RoleType>,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}
