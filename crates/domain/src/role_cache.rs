use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RoleType, UserId};

/// Denormalized set of a user's enabled role types.
///
/// Read optimization only: role profile rows are the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCacheEntry {
    user_id: UserId,
    roles: BTreeSet<RoleType>,
    refreshed_at: DateTime<Utc>,
}

impl RoleCacheEntry {
    /// Creates an empty entry for a user.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self::with_roles(user_id, BTreeSet::new())
    }

    /// Creates an entry holding exactly `roles`.
    #[must_use]
    pub fn with_roles(user_id: UserId, roles: BTreeSet<RoleType>) -> Self {
        Self {
            user_id,
            roles,
            refreshed_at: Utc::now(),
        }
    }

    /// Rebuilds an entry from persisted values.
    #[must_use]
    pub fn from_storage(
        user_id: UserId,
        roles: BTreeSet<RoleType>,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            roles,
            refreshed_at,
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the cached role types.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<RoleType> {
        &self.roles
    }

    /// Returns when the entry was last rewritten.
    #[must_use]
    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// Returns whether the role type is cached.
    #[must_use]
    pub fn contains(&self, role_type: RoleType) -> bool {
        self.roles.contains(&role_type)
    }

    /// Adds a role type. Returns `false` when it was already present.
    pub fn insert(&mut self, role_type: RoleType) -> bool {
        let inserted = self.roles.insert(role_type);
        if inserted {
            self.refreshed_at = Utc::now();
        }
        inserted
    }

    /// Removes a role type. Returns `false` when it was already absent.
    pub fn remove(&mut self, role_type: RoleType) -> bool {
        let removed = self.roles.remove(&role_type);
        if removed {
            self.refreshed_at = Utc::now();
        }
        removed
    }

    /// Returns whether the entry mirrors exactly the given enabled role types.
    #[must_use]
    pub fn mirrors(&self, enabled: &BTreeSet<RoleType>) -> bool {
        &self.roles == enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut entry = RoleCacheEntry::empty(UserId::new());

        assert!(entry.insert(RoleType::Critic));
        assert!(!entry.insert(RoleType::Critic));
        assert_eq!(entry.roles().len(), 1);
    }

    #[test]
    fn removing_absent_role_is_a_no_op() {
        let mut entry = RoleCacheEntry::with_roles(UserId::new(), BTreeSet::from([RoleType::Member]));
        let refreshed_at = entry.refreshed_at();

        assert!(!entry.remove(RoleType::Talent));
        assert_eq!(entry.refreshed_at(), refreshed_at);
        assert!(entry.contains(RoleType::Member));
    }

    #[test]
    fn mirrors_compares_exact_sets() {
        let entry = RoleCacheEntry::with_roles(
            UserId::new(),
            BTreeSet::from([RoleType::Member, RoleType::Critic]),
        );

        assert!(entry.mirrors(&BTreeSet::from([RoleType::Critic, RoleType::Member])));
        assert!(!entry.mirrors(&BTreeSet::from([RoleType::Member])));
    }
}
