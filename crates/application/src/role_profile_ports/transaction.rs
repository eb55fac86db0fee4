use async_trait::async_trait;

use reelhub_core::AppResult;
use reelhub_domain::{
    DetailProfile, DetailProfileKind, RoleCacheEntry, RoleProfile, RoleProfileId, UserId,
};

use super::audit::RoleAuditEvent;

/// Unit of work over one user's role profiles and derived records.
///
/// All writes become visible together on [`RoleProfileTransaction::commit`];
/// dropping the unit of work discards them.
#[async_trait]
pub trait RoleProfileTransaction: Send {
    /// Locks and returns every role profile of a user in role-type order.
    ///
    /// Concurrent units of work locking the same user wait until this one ends.
    async fn lock_user_roles(&mut self, user_id: UserId) -> AppResult<Vec<RoleProfile>>;

    /// Persists the mutable fields of one role profile.
    async fn save_role(&mut self, profile: &RoleProfile) -> AppResult<()>;

    /// Finds the detail record of `kind` owned by a role profile.
    async fn find_detail_profile(
        &mut self,
        kind: DetailProfileKind,
        role_profile_id: RoleProfileId,
    ) -> AppResult<Option<DetailProfile>>;

    /// Inserts a new detail record.
    async fn insert_detail_profile(&mut self, profile: &DetailProfile) -> AppResult<()>;

    /// Loads the role cache entry of a user.
    async fn load_role_cache(&mut self, user_id: UserId) -> AppResult<Option<RoleCacheEntry>>;

    /// Replaces the role cache entry of a user.
    async fn store_role_cache(&mut self, entry: &RoleCacheEntry) -> AppResult<()>;

    /// Appends one audit event.
    async fn append_audit_event(&mut self, event: RoleAuditEvent) -> AppResult<()>;

    /// Commits every write of this unit of work.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
