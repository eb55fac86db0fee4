use super::*;

impl RoleProfileService {
    /// Lists every role profile of a user in role-type order.
    ///
    /// A user without role profiles yields an empty list.
    pub async fn list_roles(&self, user_id: UserId) -> RoleProfileResult<Vec<RoleProfile>> {
        let mut roles = self.repository.list_roles(user_id).await?;
        roles.sort_by_key(RoleProfile::role_type);
        Ok(roles)
    }

    /// Returns one role profile.
    pub async fn get_role(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> RoleProfileResult<RoleProfile> {
        self.repository
            .find_role(user_id, role_type)
            .await?
            .ok_or(RoleProfileError::RoleNotFound { user_id, role_type })
    }

    /// Returns the user's default role, if one is set.
    pub async fn default_role(&self, user_id: UserId) -> RoleProfileResult<Option<RoleProfile>> {
        Ok(self
            .list_roles(user_id)
            .await?
            .into_iter()
            .find(|profile| profile.is_default() && profile.is_enabled()))
    }

    /// Returns the cached enabled role set of a user.
    pub async fn cached_roles(&self, user_id: UserId) -> RoleProfileResult<Option<RoleCacheEntry>> {
        Ok(self.repository.find_role_cache(user_id).await?)
    }

    /// Returns the detail record of a user's role, if it was ever provisioned.
    pub async fn detail_profile(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> RoleProfileResult<Option<DetailProfile>> {
        self.get_role(user_id, role_type).await?;
        Ok(self
            .repository
            .find_detail_profile(user_id, role_type)
            .await?)
    }
}
