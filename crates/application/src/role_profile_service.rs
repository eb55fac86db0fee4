use std::sync::Arc;

use tracing::{info, warn};

use reelhub_core::AppResult;
use reelhub_domain::{
    AuditAction, DetailProfile, RoleCacheEntry, RoleHandle, RoleProfile, RoleProfileError,
    RoleProfilePatch, RoleProfileResult, RoleType, UserId,
};

use crate::role_profile_store::LockedUserRoles;
use crate::{
    DetailProfileProvisioner, RoleAuditEvent, RoleCacheSynchronizer, RoleProfileRepository,
    RoleProfileTransaction,
};

mod activation;
mod deactivation;
mod queries;
mod reconcile;
mod update;

/// Result of a role activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleActivation {
    /// Role profile after activation.
    pub profile: RoleProfile,
    /// Whether the role's detail record was created by this activation.
    pub detail_created: bool,
}

/// Summary of a role cache reconciliation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCacheReconcileReport {
    /// Users whose cache was compared with their role profiles.
    pub users_checked: usize,
    /// Users whose cache had drifted and was rebuilt.
    pub caches_repaired: usize,
}

/// Application service owning every transition of a user's role profiles.
///
/// Each mutating call runs in one unit of work: role rows are locked and read,
/// the transition rules applied, derived records (cache, detail profile, audit
/// trail) written, and everything committed together or not at all.
#[derive(Clone)]
pub struct RoleProfileService {
    repository: Arc<dyn RoleProfileRepository>,
    cache_synchronizer: RoleCacheSynchronizer,
    detail_provisioner: DetailProfileProvisioner,
}

impl RoleProfileService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleProfileRepository>) -> Self {
        Self {
            repository,
            cache_synchronizer: RoleCacheSynchronizer::new(),
            detail_provisioner: DetailProfileProvisioner::new(),
        }
    }

    /// Mirrors the enabled state of `role_type` into the cache, rebuilding the
    /// whole entry from the locked rows when it does not match them.
    async fn sync_role_cache(
        &self,
        transaction: &mut dyn RoleProfileTransaction,
        roles: &LockedUserRoles,
        role_type: RoleType,
        is_enabled: bool,
    ) -> AppResult<()> {
        let user_id = roles.user_id();
        let entry = if is_enabled {
            self.cache_synchronizer
                .add_role(transaction, user_id, role_type)
                .await?
        } else {
            self.cache_synchronizer
                .remove_role(transaction, user_id, role_type)
                .await?
        };

        let enabled = roles.enabled_role_types();
        if !entry.mirrors(&enabled) {
            warn!(
                user_id = %user_id,
                cached = ?entry.roles(),
                enabled = ?enabled,
                "role cache drifted from role profiles; rebuilding"
            );
            self.cache_synchronizer
                .mirror(transaction, user_id, &enabled)
                .await?;
        }

        Ok(())
    }
}
