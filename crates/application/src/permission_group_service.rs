use std::sync::Arc;

use tracing::info;
use warden_core::{AppError, AppResult, NonEmptyString, PermissionGroupId};
use warden_domain::{Permission, PermissionGroup};

use crate::{
    CreatePermissionGroupInput, PermissionGroupRepository, PermissionGroupWithPermissions,
    PermissionRepository, UpdatePermissionGroupInput,
};

/// Application service for the permission group registry.
#[derive(Clone)]
pub struct PermissionGroupService {
    groups: Arc<dyn PermissionGroupRepository>,
    permissions: Arc<dyn PermissionRepository>,
}

impl PermissionGroupService {
    /// Creates a new service from repository implementations.
    #[must_use]
    pub fn new(
        groups: Arc<dyn PermissionGroupRepository>,
        permissions: Arc<dyn PermissionRepository>,
    ) -> Self {
        Self {
            groups,
            permissions,
        }
    }

    /// Creates a group. Fails with `Conflict` when the name is taken.
    pub async fn create(&self, input: CreatePermissionGroupInput) -> AppResult<PermissionGroup> {
        let group = PermissionGroup::new(
            PermissionGroupId::new(),
            input.name,
            input.description.unwrap_or_default(),
        )?;

        self.ensure_name_available(group.name(), None).await?;
        self.groups.insert_group(group.clone()).await?;

        info!(group_id = %group.id(), name = group.name(), "permission group created");
        Ok(group)
    }

    /// Lists live groups with their live member permissions.
    ///
    /// An empty registry is reported as `NotFound`.
    pub async fn list(&self) -> AppResult<Vec<PermissionGroupWithPermissions>> {
        let groups = self.groups.list_live_groups().await?;
        if groups.is_empty() {
            return Err(AppError::NotFound(
                "no permission groups found".to_owned(),
            ));
        }

        let permissions = self.permissions.list_live_permissions().await?;

        Ok(groups
            .into_iter()
            .map(|group| PermissionGroupWithPermissions {
                permissions: members_of(&permissions, group.id()),
                group,
            })
            .collect())
    }

    /// Returns a live group and its live member permissions.
    pub async fn get(&self, group_id: PermissionGroupId) -> AppResult<PermissionGroupWithPermissions> {
        let group = self
            .groups
            .find_group(group_id)
            .await?
            .filter(PermissionGroup::is_live)
            .ok_or_else(|| group_not_found(group_id))?;

        let permissions = self.permissions.list_live_permissions().await?;

        Ok(PermissionGroupWithPermissions {
            permissions: members_of(&permissions, group.id()),
            group,
        })
    }

    /// Applies a partial update to a non-deleted group.
    pub async fn update(
        &self,
        group_id: PermissionGroupId,
        input: UpdatePermissionGroupInput,
    ) -> AppResult<PermissionGroup> {
        let mut group = self
            .groups
            .find_group(group_id)
            .await?
            .filter(|group| !group.is_deleted())
            .ok_or_else(|| group_not_found(group_id))?;

        if let Some(name) = input.name {
            let name = NonEmptyString::for_field("name", name)?;
            if name.as_str() != group.name() {
                self.ensure_name_available(name.as_str(), Some(group_id))
                    .await?;
            }
            group.rename(name);
        }

        if let Some(description) = input.description {
            group.set_description(description);
        }

        if let Some(is_active) = input.is_active {
            group.set_active(is_active);
        }

        self.groups.save_group(group.clone()).await?;

        info!(group_id = %group_id, "permission group updated");
        Ok(group)
    }

    /// Soft-deletes a group.
    pub async fn delete(&self, group_id: PermissionGroupId) -> AppResult<PermissionGroup> {
        let mut group = self
            .groups
            .find_group(group_id)
            .await?
            .filter(|group| !group.is_deleted())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "permission group '{group_id}' was not found or is already deleted"
                ))
            })?;

        group.mark_deleted();
        self.groups.save_group(group.clone()).await?;

        info!(group_id = %group_id, "permission group deleted");
        Ok(group)
    }

    /// Inactive groups keep their name reserved until deleted.
    async fn ensure_name_available(
        &self,
        name: &str,
        excluding: Option<PermissionGroupId>,
    ) -> AppResult<()> {
        let existing = self.groups.find_group_by_name(name).await?;
        match existing {
            Some(group) if Some(group.id()) != excluding => Err(AppError::Conflict(format!(
                "permission group name '{name}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

fn members_of(permissions: &[Permission], group_id: PermissionGroupId) -> Vec<Permission> {
    permissions
        .iter()
        .filter(|permission| permission.group_id() == Some(group_id))
        .cloned()
        .collect()
}

fn group_not_found(group_id: PermissionGroupId) -> AppError {
    AppError::NotFound(format!("permission group '{group_id}' was not found"))
}
