use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use reelhub_application::{RoleAuditEvent, RoleProfileTransaction};
use reelhub_core::{AppError, AppResult};
use reelhub_domain::{
    DetailProfile, DetailProfileKind, RoleCacheEntry, RoleProfile, RoleProfileId, RoleType,
    UserId,
};

use super::detail_profiles::{self, DetailLookup};
use super::{RoleCacheRow, RoleProfileRow, into_sorted_profiles};

/// Unit of work backed by one PostgreSQL transaction.
///
/// Dropping it without calling `commit` rolls the transaction back.
pub(super) struct PostgresRoleProfileTransaction {
    transaction: Transaction<'static, Postgres>,
}

impl PostgresRoleProfileTransaction {
    pub(super) fn new(transaction: Transaction<'static, Postgres>) -> Self {
        Self { transaction }
    }
}

#[async_trait]
impl RoleProfileTransaction for PostgresRoleProfileTransaction {
    #[tracing::instrument(level = "debug", skip_all, fields(user_id = %user_id))]
    async fn lock_user_roles(&mut self, user_id: UserId) -> AppResult<Vec<RoleProfile>> {
        let rows = sqlx::query_as::<_, RoleProfileRow>(
            r#"
            SELECT id, user_id, role_type, enabled, visibility, is_default, handle
            FROM role_profiles
            WHERE user_id = $1
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock role profiles: {error}")))?;

        debug!(rows = rows.len(), "locked role profiles");

        into_sorted_profiles(rows)
    }

    async fn save_role(&mut self, profile: &RoleProfile) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE role_profiles
            SET enabled = $2,
                visibility = $3,
                is_default = $4,
                handle = $5,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(profile.id().as_uuid())
        .bind(profile.is_enabled())
        .bind(profile.visibility().as_str())
        .bind(profile.is_default())
        .bind(profile.handle().map(|handle| handle.as_str()))
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| map_role_write_error(error, profile.role_type()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role profile '{}' does not exist",
                profile.id()
            )));
        }

        Ok(())
    }

    async fn find_detail_profile(
        &mut self,
        kind: DetailProfileKind,
        role_profile_id: RoleProfileId,
    ) -> AppResult<Option<DetailProfile>> {
        detail_profiles::find(
            &mut *self.transaction,
            kind,
            DetailLookup::RoleProfile(role_profile_id),
        )
        .await
    }

    async fn insert_detail_profile(&mut self, profile: &DetailProfile) -> AppResult<()> {
        detail_profiles::insert(&mut *self.transaction, profile).await
    }

    async fn load_role_cache(&mut self, user_id: UserId) -> AppResult<Option<RoleCacheEntry>> {
        sqlx::query_as::<_, RoleCacheRow>(
            r#"
            SELECT user_id, roles, refreshed_at
            FROM user_role_caches
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role cache: {error}")))?
        .map(RoleCacheRow::into_entry)
        .transpose()
    }

    async fn store_role_cache(&mut self, entry: &RoleCacheEntry) -> AppResult<()> {
        let roles: Vec<String> = entry
            .roles()
            .iter()
            .map(|role_type| role_type.as_str().to_owned())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO user_role_caches (user_id, roles, refreshed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET roles = EXCLUDED.roles,
                refreshed_at = EXCLUDED.refreshed_at
            "#,
        )
        .bind(entry.user_id().as_uuid())
        .bind(roles)
        .bind(entry.refreshed_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store role cache: {error}")))?;

        Ok(())
    }

    async fn append_audit_event(&mut self, event: RoleAuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_audit_events (user_id, action, role_type, detail)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(event.user_id.as_uuid())
        .bind(event.action.as_str())
        .bind(event.role_type.map(|role_type| role_type.as_str()))
        .bind(event.detail)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit event: {error}")))?;

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }
}

fn map_role_write_error(error: sqlx::Error, role_type: RoleType) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        match database_error.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict(format!(
                    "another role profile is already the default; cannot mark '{role_type}'"
                ));
            }
            Some("23514") => {
                return AppError::Validation(format!(
                    "'{role_type}' must be active before it can become the default role"
                ));
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to save role profile: {error}"))
}
