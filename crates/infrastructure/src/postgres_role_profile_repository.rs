use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use reelhub_application::{RoleProfileRepository, RoleProfileTransaction};
use reelhub_core::{AppError, AppResult};
use reelhub_domain::{
    DetailProfile, ProfileVisibility, RoleCacheEntry, RoleHandle, RoleProfile, RoleProfileId,
    RoleProfileParts, RoleType, UserId,
};

mod detail_profiles;
mod transaction;

use detail_profiles::DetailLookup;
use transaction::PostgresRoleProfileTransaction;

/// PostgreSQL-backed repository for role profiles, detail records and role caches.
#[derive(Clone)]
pub struct PostgresRoleProfileRepository {
    pool: PgPool,
}

impl PostgresRoleProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleProfileRow {
    id: Uuid,
    user_id: Uuid,
    role_type: String,
    enabled: bool,
    visibility: String,
    is_default: bool,
    handle: Option<String>,
}

impl RoleProfileRow {
    fn into_profile(self) -> AppResult<RoleProfile> {
        Ok(RoleProfile::from_parts(RoleProfileParts {
            id: RoleProfileId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            role_type: RoleType::from_str(self.role_type.as_str())?,
            enabled: self.enabled,
            visibility: ProfileVisibility::parse(self.visibility.as_str())?,
            is_default: self.is_default,
            handle: self.handle.and_then(RoleHandle::from_storage),
        }))
    }
}

#[derive(Debug, FromRow)]
struct RoleCacheRow {
    user_id: Uuid,
    roles: Vec<String>,
    refreshed_at: DateTime<Utc>,
}

impl RoleCacheRow {
    fn into_entry(self) -> AppResult<RoleCacheEntry> {
        let roles = self
            .roles
            .iter()
            .map(|value| RoleType::from_str(value.as_str()))
            .collect::<AppResult<BTreeSet<_>>>()?;

        Ok(RoleCacheEntry::from_storage(
            UserId::from_uuid(self.user_id),
            roles,
            self.refreshed_at,
        ))
    }
}

fn into_sorted_profiles(rows: Vec<RoleProfileRow>) -> AppResult<Vec<RoleProfile>> {
    let mut profiles = rows
        .into_iter()
        .map(RoleProfileRow::into_profile)
        .collect::<AppResult<Vec<_>>>()?;
    profiles.sort_by_key(RoleProfile::role_type);
    Ok(profiles)
}

#[async_trait]
impl RoleProfileRepository for PostgresRoleProfileRepository {
    async fn list_roles(&self, user_id: UserId) -> AppResult<Vec<RoleProfile>> {
        let rows = sqlx::query_as::<_, RoleProfileRow>(
            r#"
            SELECT id, user_id, role_type, enabled, visibility, is_default, handle
            FROM role_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role profiles: {error}")))?;

        into_sorted_profiles(rows)
    }

    async fn find_role(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<Option<RoleProfile>> {
        sqlx::query_as::<_, RoleProfileRow>(
            r#"
            SELECT id, user_id, role_type, enabled, visibility, is_default, handle
            FROM role_profiles
            WHERE user_id = $1 AND role_type = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role profile: {error}")))?
        .map(RoleProfileRow::into_profile)
        .transpose()
    }

    async fn find_role_cache(&self, user_id: UserId) -> AppResult<Option<RoleCacheEntry>> {
        sqlx::query_as::<_, RoleCacheRow>(
            r#"
            SELECT user_id, roles, refreshed_at
            FROM user_role_caches
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role cache: {error}")))?
        .map(RoleCacheRow::into_entry)
        .transpose()
    }

    async fn find_detail_profile(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<Option<DetailProfile>> {
        let Some(kind) = role_type.detail_kind() else {
            return Ok(None);
        };

        detail_profiles::find(&self.pool, kind, DetailLookup::User(user_id)).await
    }

    async fn list_users_with_roles(&self) -> AppResult<Vec<UserId>> {
        let user_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT user_id
            FROM role_profiles
            ORDER BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list users with role profiles: {error}"))
        })?;

        Ok(user_ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn begin(&self) -> AppResult<Box<dyn RoleProfileTransaction>> {
        let transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        Ok(Box::new(PostgresRoleProfileTransaction::new(transaction)))
    }
}

#[cfg(test)]
mod tests;
