use reelhub_core::AppError;
use thiserror::Error;

use crate::{RoleType, UserId};

/// Result type returned by role profile use-cases.
pub type RoleProfileResult<T> = Result<T, RoleProfileError>;

/// Failures of role profile transitions.
#[derive(Debug, Error)]
pub enum RoleProfileError {
    /// The user has no profile row for the role type.
    #[error("user '{user_id}' has no '{role_type}' role profile")]
    RoleNotFound {
        /// Owning user.
        user_id: UserId,
        /// Requested role type.
        role_type: RoleType,
    },

    /// Deactivation would leave the user without any enabled role.
    #[error("'{role_type}' is the only active role of user '{user_id}'; activate another role first")]
    LastActiveRole {
        /// Owning user.
        user_id: UserId,
        /// Role type that was asked to be deactivated.
        role_type: RoleType,
    },

    /// A disabled role was asked to become the default.
    #[error("'{role_type}' must be active before it can become the default role")]
    DefaultRequiresEnabled {
        /// Disabled role type.
        role_type: RoleType,
    },

    /// Store or validation failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<RoleProfileError> for AppError {
    fn from(value: RoleProfileError) -> Self {
        match value {
            RoleProfileError::RoleNotFound { .. } => Self::NotFound(value.to_string()),
            RoleProfileError::LastActiveRole { .. } => Self::Conflict(value.to_string()),
            RoleProfileError::DefaultRequiresEnabled { .. } => {
                Self::Validation(value.to_string())
            }
            RoleProfileError::Store(error) => error,
        }
    }
}
