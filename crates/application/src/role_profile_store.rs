use std::collections::BTreeSet;

use reelhub_core::AppResult;
use reelhub_domain::{
    RoleProfile, RoleProfileError, RoleProfilePatch, RoleProfileResult, RoleType, UserId,
};

use crate::RoleProfileTransaction;

/// A user's role profiles, locked for the lifetime of one unit of work.
///
/// Changes stay in memory until [`LockedUserRoles::flush`] writes the rows that
/// differ from what was read.
#[derive(Debug)]
pub(crate) struct LockedUserRoles {
    user_id: UserId,
    persisted: Vec<RoleProfile>,
    current: Vec<RoleProfile>,
}

impl LockedUserRoles {
    /// Locks and loads every role profile of the user.
    pub(crate) async fn lock(
        transaction: &mut dyn RoleProfileTransaction,
        user_id: UserId,
    ) -> AppResult<Self> {
        let mut profiles = transaction.lock_user_roles(user_id).await?;
        profiles.sort_by_key(RoleProfile::role_type);

        Ok(Self {
            user_id,
            persisted: profiles.clone(),
            current: profiles,
        })
    }

    pub(crate) fn user_id(&self) -> UserId {
        self.user_id
    }

    pub(crate) fn get(&self, role_type: RoleType) -> RoleProfileResult<&RoleProfile> {
        let index = self.position(role_type)?;
        Ok(&self.current[index])
    }

    pub(crate) fn get_mut(&mut self, role_type: RoleType) -> RoleProfileResult<&mut RoleProfile> {
        let index = self.position(role_type)?;
        Ok(&mut self.current[index])
    }

    pub(crate) fn enabled_count(&self) -> usize {
        self.current
            .iter()
            .filter(|profile| profile.is_enabled())
            .count()
    }

    pub(crate) fn enabled_role_types(&self) -> BTreeSet<RoleType> {
        self.current
            .iter()
            .filter(|profile| profile.is_enabled())
            .map(RoleProfile::role_type)
            .collect()
    }

    /// Returns the enabled default role, ignoring stale flags on disabled rows.
    pub(crate) fn default_role(&self) -> Option<&RoleProfile> {
        self.current
            .iter()
            .find(|profile| profile.is_default() && profile.is_enabled())
    }

    /// Applies a partial update to one role profile.
    ///
    /// Marking the row as default clears the flag on every sibling row in the
    /// same unit of work.
    pub(crate) fn patch_role(
        &mut self,
        role_type: RoleType,
        patch: &RoleProfilePatch,
    ) -> RoleProfileResult<RoleProfile> {
        let index = self.position(role_type)?;
        self.current[index].apply_patch(patch)?;

        if patch.is_default == Some(true) {
            for sibling in self
                .current
                .iter_mut()
                .filter(|profile| profile.role_type() != role_type)
            {
                sibling.clear_default();
            }
        }

        Ok(self.current[index].clone())
    }

    /// Makes the enabled role with the lowest ordinal, other than `excluding`,
    /// the default. Returns the promoted role type.
    pub(crate) fn promote_default(
        &mut self,
        excluding: RoleType,
    ) -> RoleProfileResult<Option<RoleType>> {
        let Some(successor) = self
            .current
            .iter()
            .find(|profile| profile.is_enabled() && profile.role_type() != excluding)
            .map(RoleProfile::role_type)
        else {
            return Ok(None);
        };

        self.patch_role(
            successor,
            &RoleProfilePatch {
                is_default: Some(true),
                ..RoleProfilePatch::default()
            },
        )?;

        Ok(Some(successor))
    }

    /// Writes every changed row and returns how many were written.
    pub(crate) async fn flush(
        &mut self,
        transaction: &mut dyn RoleProfileTransaction,
    ) -> AppResult<usize> {
        let mut changed: Vec<&RoleProfile> = self
            .current
            .iter()
            .zip(&self.persisted)
            .filter(|(current, persisted)| current != persisted)
            .map(|(current, _)| current)
            .collect();

        // Rows losing the default flag go first so no single write sees two defaults.
        changed.sort_by_key(|profile| profile.is_default());

        for profile in &changed {
            transaction.save_role(profile).await?;
        }

        let written = changed.len();
        self.persisted.clone_from(&self.current);
        Ok(written)
    }

    fn position(&self, role_type: RoleType) -> RoleProfileResult<usize> {
        self.current
            .iter()
            .position(|profile| profile.role_type() == role_type)
            .ok_or(RoleProfileError::RoleNotFound {
                user_id: self.user_id,
                role_type,
            })
    }
}
