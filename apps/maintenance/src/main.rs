//! Reelhub maintenance runner: schema migrations and role cache repair.

#![forbid(unsafe_code)]

mod config;

use std::sync::Arc;

use reelhub_application::RoleProfileService;
use reelhub_core::{AppError, AppResult};
use reelhub_infrastructure::{PostgresRoleProfileRepository, run_migrations};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{MaintenanceCommand, MaintenanceConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = MaintenanceConfig::load()?;
    let pool = connect_pool(&config).await?;

    info!(command = config.command.as_str(), "reelhub-maintenance started");

    match config.command {
        MaintenanceCommand::Migrate => {
            run_migrations(&pool).await?;
            info!("database migrations applied");
        }
        MaintenanceCommand::ReconcileRoleCaches => {
            let service =
                RoleProfileService::new(Arc::new(PostgresRoleProfileRepository::new(pool)));
            let report = service.reconcile_all_role_caches().await?;
            info!(
                users_checked = report.users_checked,
                caches_repaired = report.caches_repaired,
                "role cache reconciliation finished"
            );
        }
    }

    Ok(())
}

async fn connect_pool(config: &MaintenanceConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
