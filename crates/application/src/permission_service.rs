use std::sync::Arc;

use tracing::info;
use warden_core::{AppError, AppResult, PermissionGroupId, PermissionId};
use warden_domain::{Permission, PermissionGroup, PermissionKey};

use crate::{
    CreatePermissionInput, PermissionGroupRepository, PermissionRepository, PermissionWithGroup,
    UpdatePermissionInput,
};

/// Application service for the permission catalog.
#[derive(Clone)]
pub struct PermissionService {
    permissions: Arc<dyn PermissionRepository>,
    groups: Arc<dyn PermissionGroupRepository>,
}

impl PermissionService {
    /// Creates a new service from repository implementations.
    #[must_use]
    pub fn new(
        permissions: Arc<dyn PermissionRepository>,
        groups: Arc<dyn PermissionGroupRepository>,
    ) -> Self {
        Self {
            permissions,
            groups,
        }
    }

    /// Registers a permission key.
    ///
    /// Keys stay reserved after soft deletion, so a deleted key conflicts too.
    pub async fn create(&self, input: CreatePermissionInput) -> AppResult<Permission> {
        let key = PermissionKey::new(input.key)?;
        self.ensure_key_available(&key, None).await?;
        if let Some(group_id) = input.group_id {
            self.require_live_group(group_id).await?;
        }

        let permission = Permission::new(
            PermissionId::new(),
            key,
            input.description.unwrap_or_default(),
            input.group_id,
        );
        self.permissions
            .insert_permission(permission.clone())
            .await?;

        info!(
            permission_id = %permission.id(),
            key = permission.key().as_str(),
            "permission created"
        );
        Ok(permission)
    }

    /// Lists live permissions joined with their owning group when it resolves.
    pub async fn list(&self) -> AppResult<Vec<PermissionWithGroup>> {
        let permissions = self.permissions.list_live_permissions().await?;

        let mut group_ids: Vec<PermissionGroupId> = permissions
            .iter()
            .filter_map(Permission::group_id)
            .collect();
        group_ids.sort_unstable();
        group_ids.dedup();
        let groups = self.groups.list_groups_by_ids(&group_ids).await?;

        Ok(permissions
            .into_iter()
            .map(|permission| PermissionWithGroup {
                group: owning_group(&groups, &permission),
                permission,
            })
            .collect())
    }

    /// Returns a live permission and its owning group.
    pub async fn get(&self, permission_id: PermissionId) -> AppResult<PermissionWithGroup> {
        let permission = self.require_live_permission(permission_id).await?;
        let group = match permission.group_id() {
            Some(group_id) => self
                .groups
                .find_group(group_id)
                .await?
                .filter(|group| !group.is_deleted()),
            None => None,
        };

        Ok(PermissionWithGroup { permission, group })
    }

    /// Applies a partial update to a live permission.
    pub async fn update(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        let mut permission = self.require_live_permission(permission_id).await?;

        if let Some(key) = input.key {
            let key = PermissionKey::new(key)?;
            if &key != permission.key() {
                self.ensure_key_available(&key, Some(permission_id)).await?;
            }
            permission.set_key(key);
        }

        if let Some(group_id) = input.group_id {
            if let Some(group_id) = group_id {
                self.require_live_group(group_id).await?;
            }
            permission.set_group_id(group_id);
        }

        if let Some(description) = input.description {
            permission.set_description(description);
        }

        if let Some(is_active) = input.is_active {
            permission.set_active(is_active);
        }

        self.permissions.save_permission(permission.clone()).await?;

        info!(permission_id = %permission_id, "permission updated");
        Ok(permission)
    }

    /// Soft-deletes a permission. Roles keep their references.
    pub async fn delete(&self, permission_id: PermissionId) -> AppResult<Permission> {
        let mut permission = self
            .permissions
            .find_permission(permission_id)
            .await?
            .filter(|permission| !permission.is_deleted())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "permission '{permission_id}' was not found or is already deleted"
                ))
            })?;

        permission.mark_deleted();
        self.permissions.save_permission(permission.clone()).await?;

        info!(permission_id = %permission_id, "permission deleted");
        Ok(permission)
    }

    async fn require_live_permission(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.permissions
            .find_permission(permission_id)
            .await?
            .filter(Permission::is_live)
            .ok_or_else(|| AppError::NotFound(format!("permission '{permission_id}' was not found")))
    }

    async fn require_live_group(&self, group_id: PermissionGroupId) -> AppResult<PermissionGroup> {
        self.groups
            .find_group(group_id)
            .await?
            .filter(PermissionGroup::is_live)
            .ok_or_else(|| {
                AppError::NotFound(format!("permission group '{group_id}' was not found"))
            })
    }

    async fn ensure_key_available(
        &self,
        key: &PermissionKey,
        excluding: Option<PermissionId>,
    ) -> AppResult<()> {
        match self.permissions.find_permission_by_key(key.as_str()).await? {
            Some(existing) if Some(existing.id()) != excluding => Err(AppError::Conflict(
                format!("permission key '{}' already exists", key.as_str()),
            )),
            _ => Ok(()),
        }
    }
}

fn owning_group(groups: &[PermissionGroup], permission: &Permission) -> Option<PermissionGroup> {
    let group_id = permission.group_id()?;
    groups
        .iter()
        .find(|group| group.id() == group_id && !group.is_deleted())
        .cloned()
}
