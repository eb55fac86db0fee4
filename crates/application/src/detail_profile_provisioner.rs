use reelhub_core::AppResult;
use reelhub_domain::{DetailProfile, RoleProfileId, RoleType, UserId};

use crate::RoleProfileTransaction;

/// Outcome of [`DetailProfileProvisioner::ensure_detail_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedDetail {
    /// Existing or freshly created record; `None` for role types without one.
    pub profile: Option<DetailProfile>,
    /// Whether this call inserted the record.
    pub created: bool,
}

/// Creates role-specific detail records on first activation.
///
/// Dispatches on [`RoleType::detail_kind`]. Detail schemas differ per kind, so
/// existence is checked before inserting instead of relying on a uniform
/// uniqueness constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailProfileProvisioner;

impl DetailProfileProvisioner {
    /// Creates a provisioner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates the detail record for a role profile unless it already exists.
    pub async fn ensure_detail_profile(
        &self,
        transaction: &mut dyn RoleProfileTransaction,
        user_id: UserId,
        role_type: RoleType,
        role_profile_id: RoleProfileId,
    ) -> AppResult<ProvisionedDetail> {
        let Some(kind) = role_type.detail_kind() else {
            return Ok(ProvisionedDetail {
                profile: None,
                created: false,
            });
        };

        if let Some(existing) = transaction
            .find_detail_profile(kind, role_profile_id)
            .await?
        {
            return Ok(ProvisionedDetail {
                profile: Some(existing),
                created: false,
            });
        }

        let profile = DetailProfile::blank(kind, user_id, role_profile_id);
        transaction.insert_detail_profile(&profile).await?;

        Ok(ProvisionedDetail {
            profile: Some(profile),
            created: true,
        })
    }
}
