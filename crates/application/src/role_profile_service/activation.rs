use super::*;

impl RoleProfileService {
    /// Activates a role and provisions its detail record on first activation.
    ///
    /// Re-activating an enabled role only re-applies `handle` and never creates
    /// a second detail record. When the user has no enabled default role, the
    /// activated role becomes the default.
    pub async fn activate_role(
        &self,
        user_id: UserId,
        role_type: RoleType,
        handle: Option<RoleHandle>,
    ) -> RoleProfileResult<RoleActivation> {
        let mut transaction = self.repository.begin().await?;
        let mut roles = LockedUserRoles::lock(transaction.as_mut(), user_id).await?;

        let was_enabled = roles.get(role_type)?.is_enabled();
        roles.get_mut(role_type)?.activate(handle);

        let became_default = roles.default_role().is_none();
        if became_default {
            roles.patch_role(
                role_type,
                &RoleProfilePatch {
                    is_default: Some(true),
                    ..RoleProfilePatch::default()
                },
            )?;
        }

        roles.flush(transaction.as_mut()).await?;
        self.sync_role_cache(transaction.as_mut(), &roles, role_type, true)
            .await?;

        let profile = roles.get(role_type)?.clone();
        let detail = self
            .detail_provisioner
            .ensure_detail_profile(transaction.as_mut(), user_id, role_type, profile.id())
            .await?;

        transaction
            .append_audit_event(RoleAuditEvent {
                user_id,
                action: AuditAction::RoleProfileActivated,
                role_type: Some(role_type),
                detail: Some(format!(
                    "activated role '{role_type}' (detail created: {})",
                    detail.created
                )),
            })
            .await?;

        transaction.commit().await?;

        info!(
            user_id = %user_id,
            role_type = %role_type,
            was_enabled,
            became_default,
            detail_created = detail.created,
            "role profile activated"
        );

        Ok(RoleActivation {
            profile,
            detail_created: detail.created,
        })
    }
}
