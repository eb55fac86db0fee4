use std::collections::BTreeSet;

use reelhub_core::AppResult;
use reelhub_domain::{RoleCacheEntry, RoleType, UserId};

use crate::RoleProfileTransaction;

/// Mirrors a user's enabled role types into their role cache entry.
///
/// Holds no invariant authority of its own. Always invoked after the role rows
/// were written, inside the same unit of work. A missing entry reads as an
/// empty role set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleCacheSynchronizer;

impl RoleCacheSynchronizer {
    /// Creates a synchronizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Adds a role type to the cached set. Adding a present role is a no-op.
    pub async fn add_role(
        &self,
        transaction: &mut dyn RoleProfileTransaction,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<RoleCacheEntry> {
        let existing = transaction.load_role_cache(user_id).await?;
        let is_new_entry = existing.is_none();
        let mut entry = existing.unwrap_or_else(|| RoleCacheEntry::empty(user_id));

        if entry.insert(role_type) || is_new_entry {
            transaction.store_role_cache(&entry).await?;
        }

        Ok(entry)
    }

    /// Removes a role type from the cached set. Removing an absent role is a no-op.
    pub async fn remove_role(
        &self,
        transaction: &mut dyn RoleProfileTransaction,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<RoleCacheEntry> {
        let Some(mut entry) = transaction.load_role_cache(user_id).await? else {
            return Ok(RoleCacheEntry::empty(user_id));
        };

        if entry.remove(role_type) {
            transaction.store_role_cache(&entry).await?;
        }

        Ok(entry)
    }

    /// Rewrites the entry to hold exactly `enabled`. Returns whether it had drifted.
    pub async fn mirror(
        &self,
        transaction: &mut dyn RoleProfileTransaction,
        user_id: UserId,
        enabled: &BTreeSet<RoleType>,
    ) -> AppResult<bool> {
        let is_mirrored = match transaction.load_role_cache(user_id).await? {
            Some(entry) => entry.mirrors(enabled),
            None => enabled.is_empty(),
        };

        if is_mirrored {
            return Ok(false);
        }

        transaction
            .store_role_cache(&RoleCacheEntry::with_roles(user_id, enabled.clone()))
            .await?;

        Ok(true)
    }
}
