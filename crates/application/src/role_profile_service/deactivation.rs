use super::*;

impl RoleProfileService {
    /// Deactivates a role, hiding it and handing the default flag to another
    /// enabled role when needed.
    ///
    /// Fails with [`RoleProfileError::LastActiveRole`] before any write when the
    /// role is the user's only enabled one. Detail records are kept so a later
    /// activation restores the role without data loss.
    pub async fn deactivate_role(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> RoleProfileResult<RoleProfile> {
        let mut transaction = self.repository.begin().await?;
        let mut roles = LockedUserRoles::lock(transaction.as_mut(), user_id).await?;

        if roles.get(role_type)?.is_enabled() && roles.enabled_count() == 1 {
            warn!(
                user_id = %user_id,
                role_type = %role_type,
                "refused to deactivate the last active role"
            );
            return Err(RoleProfileError::LastActiveRole { user_id, role_type });
        }

        let was_default = roles.get_mut(role_type)?.deactivate();
        let promoted = if was_default {
            roles.promote_default(role_type)?
        } else {
            None
        };

        roles.flush(transaction.as_mut()).await?;
        self.sync_role_cache(transaction.as_mut(), &roles, role_type, false)
            .await?;

        let profile = roles.get(role_type)?.clone();

        transaction
            .append_audit_event(RoleAuditEvent {
                user_id,
                action: AuditAction::RoleProfileDeactivated,
                role_type: Some(role_type),
                detail: Some(match promoted {
                    Some(successor) => format!(
                        "deactivated role '{role_type}'; default moved to '{successor}'"
                    ),
                    None => format!("deactivated role '{role_type}'"),
                }),
            })
            .await?;

        transaction.commit().await?;

        info!(
            user_id = %user_id,
            role_type = %role_type,
            was_default,
            promoted_default = ?promoted,
            "role profile deactivated"
        );

        Ok(profile)
    }
}
