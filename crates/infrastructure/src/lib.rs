//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod postgres_role_profile_repository;

use reelhub_core::{AppError, AppResult};
use sqlx::PgPool;
use sqlx::migrate::Migrator;

pub use postgres_role_profile_repository::PostgresRoleProfileRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))
}
