//! Role-specific detail records.
//!
//! Each role type that carries auxiliary data maps to one [`DetailProfileKind`],
//! and each kind to one [`DetailProfile`] variant. Adding a role type with
//! detail data means adding a kind, a variant and its storage handler.

use std::str::FromStr;

use reelhub_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{RoleProfileId, RoleType, UserId};

/// Kinds of role-specific detail records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailProfileKind {
    /// Critic hub profile.
    Critic,
    /// Talent profile shown to casting calls.
    Talent,
    /// Industry professional profile.
    Industry,
}

impl DetailProfileKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critic => "critic",
            Self::Talent => "talent",
            Self::Industry => "industry",
        }
    }

    /// Returns the role type this kind belongs to.
    #[must_use]
    pub fn role_type(&self) -> RoleType {
        match self {
            Self::Critic => RoleType::Critic,
            Self::Talent => RoleType::Talent,
            Self::Industry => RoleType::Industry,
        }
    }
}

impl FromStr for DetailProfileKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "critic" => Ok(Self::Critic),
            "talent" => Ok(Self::Talent),
            "industry" => Ok(Self::Industry),
            _ => Err(AppError::Validation(format!(
                "unknown detail profile kind '{value}'"
            ))),
        }
    }
}

/// Detail record for the critic role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticProfile {
    /// Owning role profile.
    pub role_profile_id: RoleProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Publication or outlet the critic writes for.
    pub outlet: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// Whether the critic hub verified this critic.
    pub verified: bool,
}

/// Detail record for the talent role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentProfile {
    /// Owning role profile.
    pub role_profile_id: RoleProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Listed skills, e.g. "stage combat".
    pub skills: Vec<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// Whether casting calls may contact this user.
    pub available_for_casting: bool,
}

/// Detail record for the industry role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryProfile {
    /// Owning role profile.
    pub role_profile_id: RoleProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Employer.
    pub company: Option<String>,
    /// Job title at the employer.
    pub job_title: Option<String>,
}

/// Role-specific detail record, one variant per [`DetailProfileKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailProfile {
    /// Critic detail record.
    Critic(CriticProfile),
    /// Talent detail record.
    Talent(TalentProfile),
    /// Industry detail record.
    Industry(IndustryProfile),
}

impl DetailProfile {
    /// Creates an empty detail record of `kind` for a role profile.
    #[must_use]
    pub fn blank(kind: DetailProfileKind, user_id: UserId, role_profile_id: RoleProfileId) -> Self {
        match kind {
            DetailProfileKind::Critic => Self::Critic(CriticProfile {
                role_profile_id,
                user_id,
                outlet: None,
                bio: None,
                verified: false,
            }),
            DetailProfileKind::Talent => Self::Talent(TalentProfile {
                role_profile_id,
                user_id,
                skills: Vec::new(),
                bio: None,
                available_for_casting: false,
            }),
            DetailProfileKind::Industry => Self::Industry(IndustryProfile {
                role_profile_id,
                user_id,
                company: None,
                job_title: None,
            }),
        }
    }

    /// Returns the kind of this record.
    #[must_use]
    pub fn kind(&self) -> DetailProfileKind {
        match self {
            Self::Critic(_) => DetailProfileKind::Critic,
            Self::Talent(_) => DetailProfileKind::Talent,
            Self::Industry(_) => DetailProfileKind::Industry,
        }
    }

    /// Returns the owning role profile.
    #[must_use]
    pub fn role_profile_id(&self) -> RoleProfileId {
        match self {
            Self::Critic(profile) => profile.role_profile_id,
            Self::Talent(profile) => profile.role_profile_id,
            Self::Industry(profile) => profile.role_profile_id,
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Critic(profile) => profile.user_id,
            Self::Talent(profile) => profile.user_id,
            Self::Industry(profile) => profile.user_id,
        }
    }
}
