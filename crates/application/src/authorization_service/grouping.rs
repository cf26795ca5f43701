use std::collections::HashSet;

use warden_core::{AppError, AppResult, PermissionId, RoleId};
use warden_domain::GroupView;
use warden_domain::permission_view::{bucket_permissions, label_buckets, referenced_group_ids};

use super::AuthorizationService;

impl AuthorizationService {
    /// Returns the live catalog bucketed by group, flagged against the role.
    pub async fn role_permissions_grouped(&self, role_id: RoleId) -> AppResult<Vec<GroupView>> {
        let role = self
            .roles
            .find_role(role_id)
            .await?
            .filter(|role| !role.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        let catalog = self.permissions.list_live_permissions().await?;
        let assigned: HashSet<PermissionId> = role.permission_ids().iter().copied().collect();

        let buckets = bucket_permissions(&catalog, &assigned);
        let groups = self
            .groups
            .list_groups_by_ids(&referenced_group_ids(&buckets))
            .await?;

        Ok(label_buckets(buckets, &groups))
    }
}
