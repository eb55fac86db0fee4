//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod detail_profile;
mod error;
mod role;
mod role_cache;
mod user;

pub use audit::AuditAction;
pub use detail_profile::{
    CriticProfile, DetailProfile, DetailProfileKind, IndustryProfile, TalentProfile,
};
pub use error::{RoleProfileError, RoleProfileResult};
pub use role::{
    ProfileVisibility, RoleHandle, RoleProfile, RoleProfileId, RoleProfileParts, RoleProfilePatch,
    RoleType,
};
pub use role_cache::RoleCacheEntry;
pub use user::UserId;
