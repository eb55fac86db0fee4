use super::*;

impl RoleProfileService {
    /// Rebuilds a user's role cache from their role profiles.
    ///
    /// Returns whether the cache had drifted and was rewritten.
    pub async fn reconcile_role_cache(&self, user_id: UserId) -> RoleProfileResult<bool> {
        let mut transaction = self.repository.begin().await?;
        let roles = LockedUserRoles::lock(transaction.as_mut(), user_id).await?;
        let enabled = roles.enabled_role_types();

        let repaired = self
            .cache_synchronizer
            .mirror(transaction.as_mut(), user_id, &enabled)
            .await?;

        if repaired {
            transaction
                .append_audit_event(RoleAuditEvent {
                    user_id,
                    action: AuditAction::RoleCacheReconciled,
                    role_type: None,
                    detail: Some(format!("role cache rebuilt with {} role(s)", enabled.len())),
                })
                .await?;
        }

        transaction.commit().await?;

        if repaired {
            info!(user_id = %user_id, roles = ?enabled, "role cache reconciled");
        }

        Ok(repaired)
    }

    /// Reconciles the role cache of every user owning role profiles.
    pub async fn reconcile_all_role_caches(&self) -> RoleProfileResult<RoleCacheReconcileReport> {
        let user_ids = self.repository.list_users_with_roles().await?;
        let mut report = RoleCacheReconcileReport::default();

        for user_id in user_ids {
            if self.reconcile_role_cache(user_id).await? {
                report.caches_repaired += 1;
            }
            report.users_checked += 1;
        }

        Ok(report)
    }
}
