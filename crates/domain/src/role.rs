//! Role profile entities and their per-row transition rules.
//!
//! A user holds at most one [`RoleProfile`] per [`RoleType`]. Cross-row rules
//! (single default, last enabled role) are enforced by the application layer,
//! which always works on the full, locked set of a user's rows.

use std::str::FromStr;

use reelhub_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DetailProfileKind, RoleProfileError, UserId};

/// Identity facets a user account can hold.
///
/// Declaration order is the role-type ordinal: it breaks ties whenever a role
/// has to be picked deterministically, e.g. when promoting a new default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    /// General platform member.
    Member,
    /// Film critic publishing through the critic hub.
    Critic,
    /// Performer or crew member visible to casting calls.
    Talent,
    /// Industry professional (studio, agency, distributor).
    Industry,
}

impl RoleType {
    /// Returns a stable storage value for this role type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Critic => "critic",
            Self::Talent => "talent",
            Self::Industry => "industry",
        }
    }

    /// Returns all role types in ordinal order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleType] = &[
            RoleType::Member,
            RoleType::Critic,
            RoleType::Talent,
            RoleType::Industry,
        ];

        ALL
    }

    /// Returns the detail record kind provisioned for this role type, if any.
    #[must_use]
    pub fn detail_kind(&self) -> Option<DetailProfileKind> {
        match self {
            Self::Member => None,
            Self::Critic => Some(DetailProfileKind::Critic),
            Self::Talent => Some(DetailProfileKind::Talent),
            Self::Industry => Some(DetailProfileKind::Industry),
        }
    }
}

impl std::fmt::Display for RoleType {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RoleType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(Self::Member),
            "critic" => Ok(Self::Critic),
            "talent" => Ok(Self::Talent),
            "industry" => Ok(Self::Industry),
            _ => Err(AppError::Validation(format!(
                "unknown role type '{value}'"
            ))),
        }
    }
}

/// Visibility of a role profile to other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVisibility {
    /// Listed and viewable by everyone.
    Public,
    /// Only visible to the owner.
    Private,
}

impl ProfileVisibility {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    /// Parses a storage string into a visibility.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(AppError::Validation(format!(
                "unknown profile visibility '{value}'"
            ))),
        }
    }
}

/// Unique identifier for a role profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleProfileId(Uuid);

impl RoleProfileId {
    /// Creates a new random role profile identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role profile identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoleProfileId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// User-chosen display handle for one role profile, e.g. "Jane Doe".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleHandle(NonEmptyString);

impl RoleHandle {
    /// Creates a handle from user input. Surrounding whitespace is trimmed and
    /// a blank value is rejected.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value: String = value.into();
        let handle = NonEmptyString::new(value.trim()).map_err(|_| {
            AppError::Validation("role handle must not be empty".to_owned())
        })?;

        Ok(Self(handle))
    }

    /// Rebuilds a handle from a stored value without reshaping it.
    ///
    /// A blank stored value reads as no handle.
    #[must_use]
    pub fn from_storage(value: String) -> Option<Self> {
        NonEmptyString::new(value).ok().map(Self)
    }

    /// Returns the handle string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RoleHandle> for String {
    fn from(value: RoleHandle) -> Self {
        value.0.into()
    }
}

/// Persisted field values used to rebuild a [`RoleProfile`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProfileParts {
    /// Row identifier.
    pub id: RoleProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Role facet.
    pub role_type: RoleType,
    /// Whether the role is active.
    pub enabled: bool,
    /// Visibility to other users.
    pub visibility: ProfileVisibility,
    /// Whether this is the user's default role.
    pub is_default: bool,
    /// Optional display handle.
    pub handle: Option<RoleHandle>,
}

/// One identity facet of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    id: RoleProfileId,
    user_id: UserId,
    role_type: RoleType,
    enabled: bool,
    visibility: ProfileVisibility,
    is_default: bool,
    handle: Option<RoleHandle>,
}

impl RoleProfile {
    /// Creates a freshly provisioned role profile: disabled, private, not default.
    #[must_use]
    pub fn new(id: RoleProfileId, user_id: UserId, role_type: RoleType) -> Self {
        Self {
            id,
            user_id,
            role_type,
            enabled: false,
            visibility: ProfileVisibility::Private,
            is_default: false,
            handle: None,
        }
    }

    /// Rebuilds a role profile from persisted values.
    #[must_use]
    pub fn from_parts(parts: RoleProfileParts) -> Self {
        Self {
            id: parts.id,
            user_id: parts.user_id,
            role_type: parts.role_type,
            enabled: parts.enabled,
            visibility: parts.visibility,
            is_default: parts.is_default,
            handle: parts.handle,
        }
    }

    /// Returns the row identifier.
    #[must_use]
    pub fn id(&self) -> RoleProfileId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role facet.
    #[must_use]
    pub fn role_type(&self) -> RoleType {
        self.role_type
    }

    /// Returns whether the role is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the role visibility.
    #[must_use]
    pub fn visibility(&self) -> ProfileVisibility {
        self.visibility
    }

    /// Returns whether this is the user's default role.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Returns the display handle, if one was chosen.
    #[must_use]
    pub fn handle(&self) -> Option<&RoleHandle> {
        self.handle.as_ref()
    }

    /// Enables the role, replacing the handle when one is supplied.
    pub fn activate(&mut self, handle: Option<RoleHandle>) {
        self.enabled = true;
        if let Some(handle) = handle {
            self.handle = Some(handle);
        }
    }

    /// Disables the role and hides it. Returns whether it was the default.
    pub fn deactivate(&mut self) -> bool {
        let was_default = self.is_default;
        self.enabled = false;
        self.visibility = ProfileVisibility::Private;
        self.is_default = false;
        was_default
    }

    /// Marks this role as the default. A disabled role can never be the default.
    pub fn mark_default(&mut self) -> Result<(), RoleProfileError> {
        if !self.enabled {
            return Err(RoleProfileError::DefaultRequiresEnabled {
                role_type: self.role_type,
            });
        }

        self.is_default = true;
        Ok(())
    }

    /// Removes the default flag from this role.
    pub fn clear_default(&mut self) {
        self.is_default = false;
    }

    /// Applies the fields present in `patch`, leaving the others untouched.
    ///
    /// Only touches this row; clearing the default on sibling rows is the
    /// caller's job.
    pub fn apply_patch(&mut self, patch: &RoleProfilePatch) -> Result<(), RoleProfileError> {
        match patch.is_default {
            Some(true) => self.mark_default()?,
            Some(false) => self.clear_default(),
            None => {}
        }

        if let Some(visibility) = patch.visibility {
            self.visibility = visibility;
        }

        if let Some(handle) = &patch.handle {
            self.handle = handle.clone();
        }

        Ok(())
    }
}

/// Partial update of the cosmetic fields of a role profile.
///
/// Has no `enabled` field; enabling and disabling go through the activation
/// and deactivation transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleProfilePatch {
    /// New visibility.
    pub visibility: Option<ProfileVisibility>,
    /// New handle; `Some(None)` clears it.
    pub handle: Option<Option<RoleHandle>>,
    /// New default flag.
    pub is_default: Option<bool>,
}

impl RoleProfilePatch {
    /// Returns whether the patch carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visibility.is_none() && self.handle.is_none() && self.is_default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role_type: RoleType) -> RoleProfile {
        RoleProfile::new(RoleProfileId::new(), UserId::new(), role_type)
    }

    #[test]
    fn role_type_ordinal_follows_declaration_order() {
        let mut shuffled = vec![
            RoleType::Industry,
            RoleType::Member,
            RoleType::Talent,
            RoleType::Critic,
        ];
        shuffled.sort();
        assert_eq!(shuffled.as_slice(), RoleType::all());
    }

    #[test]
    fn unknown_role_type_is_rejected() {
        assert!(RoleType::from_str("director").is_err());
        assert_eq!(RoleType::from_str("critic").ok(), Some(RoleType::Critic));
    }

    #[test]
    fn member_role_has_no_detail_kind() {
        assert_eq!(RoleType::Member.detail_kind(), None);
        assert_eq!(
            RoleType::Talent.detail_kind(),
            Some(DetailProfileKind::Talent)
        );
    }

    #[test]
    fn handle_is_trimmed() {
        let handle = RoleHandle::new("  reel_critic ").unwrap_or_else(|_| panic!("test"));
        assert_eq!(handle.as_str(), "reel_critic");
    }

    #[test]
    fn handle_accepts_display_names() {
        let handle = RoleHandle::new(" Jane Doe ").unwrap_or_else(|_| panic!("test"));
        assert_eq!(handle.as_str(), "Jane Doe");
    }

    #[test]
    fn blank_handle_is_rejected() {
        assert!(matches!(
            RoleHandle::new("   "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn stored_handle_is_read_back_verbatim() {
        let handle = RoleHandle::from_storage(" Jane Doe".to_owned())
            .unwrap_or_else(|| panic!("test"));
        assert_eq!(handle.as_str(), " Jane Doe");
        assert!(RoleHandle::from_storage("  ".to_owned()).is_none());
    }

    #[test]
    fn new_profile_starts_disabled_and_private() {
        let profile = profile(RoleType::Critic);
        assert!(!profile.is_enabled());
        assert!(!profile.is_default());
        assert_eq!(profile.visibility(), ProfileVisibility::Private);
    }

    #[test]
    fn activate_without_handle_keeps_existing_handle() {
        let mut profile = profile(RoleType::Talent);
        profile.activate(RoleHandle::new("stunts").ok());
        profile.activate(None);

        assert!(profile.is_enabled());
        assert_eq!(profile.handle().map(RoleHandle::as_str), Some("stunts"));
    }

    #[test]
    fn deactivate_forces_private_and_clears_default() {
        let mut profile = profile(RoleType::Critic);
        profile.activate(None);
        assert!(profile.mark_default().is_ok());
        profile.visibility = ProfileVisibility::Public;

        let was_default = profile.deactivate();

        assert!(was_default);
        assert!(!profile.is_enabled());
        assert!(!profile.is_default());
        assert_eq!(profile.visibility(), ProfileVisibility::Private);
    }

    #[test]
    fn disabled_role_cannot_become_default() {
        let mut profile = profile(RoleType::Industry);
        let result = profile.mark_default();
        assert!(matches!(
            result,
            Err(RoleProfileError::DefaultRequiresEnabled {
                role_type: RoleType::Industry
            })
        ));
        assert!(!profile.is_default());
    }

    #[test]
    fn patch_leaves_absent_fields_untouched() {
        let mut profile = profile(RoleType::Critic);
        profile.activate(RoleHandle::new("noir_fan").ok());

        let result = profile.apply_patch(&RoleProfilePatch {
            visibility: Some(ProfileVisibility::Public),
            ..RoleProfilePatch::default()
        });

        assert!(result.is_ok());
        assert_eq!(profile.visibility(), ProfileVisibility::Public);
        assert_eq!(profile.handle().map(RoleHandle::as_str), Some("noir_fan"));
        assert!(!profile.is_default());
    }

    #[test]
    fn patch_can_clear_handle() {
        let mut profile = profile(RoleType::Member);
        profile.activate(RoleHandle::new("popcorn").ok());

        let result = profile.apply_patch(&RoleProfilePatch {
            handle: Some(None),
            ..RoleProfilePatch::default()
        });

        assert!(result.is_ok());
        assert!(profile.handle().is_none());
    }
}
