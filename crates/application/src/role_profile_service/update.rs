use super::*;

impl RoleProfileService {
    /// Applies cosmetic changes (visibility, handle, default flag) to a role.
    ///
    /// Enabling and disabling are not reachable from here; they go through
    /// [`RoleProfileService::activate_role`] and
    /// [`RoleProfileService::deactivate_role`].
    pub async fn update_role_profile(
        &self,
        user_id: UserId,
        role_type: RoleType,
        patch: RoleProfilePatch,
    ) -> RoleProfileResult<RoleProfile> {
        let mut transaction = self.repository.begin().await?;
        let mut roles = LockedUserRoles::lock(transaction.as_mut(), user_id).await?;

        let profile = roles.patch_role(role_type, &patch)?;
        let rows_written = roles.flush(transaction.as_mut()).await?;

        if rows_written > 0 {
            transaction
                .append_audit_event(RoleAuditEvent {
                    user_id,
                    action: AuditAction::RoleProfileUpdated,
                    role_type: Some(role_type),
                    detail: Some(format!(
                        "updated role '{role_type}' ({rows_written} row(s) written)"
                    )),
                })
                .await?;
        }

        transaction.commit().await?;

        info!(
            user_id = %user_id,
            role_type = %role_type,
            rows_written,
            "role profile updated"
        );

        Ok(profile)
    }
}
