use std::collections::HashMap;

use warden_core::{AppResult, PermissionId, TenantId, UserId};
use warden_domain::{Permission, PermissionSet, is_role_visible_to};

use crate::RoleView;

use super::AuthorizationService;

impl AuthorizationService {
    /// Lists the live roles of a tenant, plus predefined roles, that `caller` may see.
    ///
    /// Visibility is decided on every referenced permission, deleted ones
    /// included, so a soft-deleted admin key still hides its role.
    pub async fn visible_roles(
        &self,
        caller: UserId,
        tenant_id: TenantId,
    ) -> AppResult<Vec<RoleView>> {
        let caller_keys = self.caller_keys(caller).await?;
        let roles = self.roles.list_live_roles_for_tenant(tenant_id).await?;

        let mut referenced: Vec<PermissionId> = roles
            .iter()
            .flat_map(|role| role.permission_ids().iter().copied())
            .collect();
        referenced.sort_unstable();
        referenced.dedup();

        let catalog: HashMap<PermissionId, Permission> = self
            .permissions
            .list_permissions_by_ids(&referenced)
            .await?
            .into_iter()
            .map(|permission| (permission.id(), permission))
            .collect();

        let views = roles
            .into_iter()
            .filter_map(|role| {
                let permissions: Vec<&Permission> = role
                    .permission_ids()
                    .iter()
                    .filter_map(|permission_id| catalog.get(permission_id))
                    .collect();

                let role_keys: PermissionSet = permissions
                    .iter()
                    .map(|permission| permission.key().as_str())
                    .collect();
                if !is_role_visible_to(&role_keys, &caller_keys) {
                    return None;
                }

                let owned = !role.is_predefined() && role.is_owned_by(caller);
                Some(RoleView {
                    permissions: permissions
                        .into_iter()
                        .filter(|permission| !permission.is_deleted())
                        .cloned()
                        .collect(),
                    can_edit: owned,
                    can_delete: owned,
                    role,
                })
            })
            .collect();

        Ok(views)
    }
}
