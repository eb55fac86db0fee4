use async_trait::async_trait;

use reelhub_core::AppResult;
use reelhub_domain::{DetailProfile, RoleCacheEntry, RoleProfile, RoleType, UserId};

use super::transaction::RoleProfileTransaction;

/// Repository port for role profiles and their derived records.
///
/// Read methods see committed state only. Every mutation goes through a unit of
/// work obtained from [`RoleProfileRepository::begin`].
#[async_trait]
pub trait RoleProfileRepository: Send + Sync {
    /// Lists every role profile of a user in role-type order.
    async fn list_roles(&self, user_id: UserId) -> AppResult<Vec<RoleProfile>>;

    /// Finds one role profile.
    async fn find_role(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<Option<RoleProfile>>;

    /// Returns the cached enabled role set of a user.
    async fn find_role_cache(&self, user_id: UserId) -> AppResult<Option<RoleCacheEntry>>;

    /// Returns the detail record provisioned for a user's role, if any.
    async fn find_detail_profile(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<Option<DetailProfile>>;

    /// Lists every user owning at least one role profile.
    async fn list_users_with_roles(&self) -> AppResult<Vec<UserId>>;

    /// Opens a unit of work. Dropping it without committing rolls it back.
    async fn begin(&self) -> AppResult<Box<dyn RoleProfileTransaction>>;
}
