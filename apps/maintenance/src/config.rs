use std::env;

use reelhub_core::{AppError, AppResult};

/// Task selected by the first command-line argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceCommand {
    Migrate,
    ReconcileRoleCaches,
}

impl MaintenanceCommand {
    pub fn parse(value: Option<&str>) -> AppResult<Self> {
        match value {
            Some("migrate") => Ok(Self::Migrate),
            Some("reconcile-role-caches") => Ok(Self::ReconcileRoleCaches),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}'; expected 'migrate' or 'reconcile-role-caches'"
            ))),
            None => Err(AppError::Validation(
                "a command is required: 'migrate' or 'reconcile-role-caches'".to_owned(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Migrate => "migrate",
            Self::ReconcileRoleCaches => "reconcile-role-caches",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    pub command: MaintenanceCommand,
    pub database_url: String,
    pub max_connections: u32,
}

impl MaintenanceConfig {
    pub fn load() -> AppResult<Self> {
        let command = MaintenanceCommand::parse(env::args().nth(1).as_deref())?;
        let database_url = required_env("DATABASE_URL")?;
        let max_connections = parse_env_u32("DATABASE_MAX_CONNECTIONS", 5)?;

        if max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            command,
            database_url,
            max_connections,
        })
    }
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::MaintenanceCommand;
    use reelhub_core::AppError;

    #[test]
    fn parses_known_commands() {
        assert_eq!(
            MaintenanceCommand::parse(Some("migrate")).ok(),
            Some(MaintenanceCommand::Migrate)
        );
        assert_eq!(
            MaintenanceCommand::parse(Some("reconcile-role-caches")).ok(),
            Some(MaintenanceCommand::ReconcileRoleCaches)
        );
    }

    #[test]
    fn rejects_missing_or_unknown_command() {
        assert!(matches!(
            MaintenanceCommand::parse(None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            MaintenanceCommand::parse(Some("vacuum")),
            Err(AppError::Validation(_))
        ));
    }
}
