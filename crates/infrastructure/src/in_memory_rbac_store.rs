use async_trait::async_trait;
use tokio::sync::RwLock;

use warden_application::{
    PermissionGroupRepository, PermissionRepository, RoleRepository, UserDirectory,
};
use warden_core::{
    AppError, AppResult, PermissionGroupId, PermissionId, RoleId, TenantId, UserId,
};
use warden_domain::{Permission, PermissionGroup, Role, UserAccount};


/// In-memory implementation of every RBAC port.
///
/// All tables live behind one lock so uniqueness and reference checks see a
/// consistent snapshot. Records keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRbacStore {
    state: RwLock<RbacTables>,
}

#[derive(Debug, Default)]
struct RbacTables {
    groups: Vec<PermissionGroup>,
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    users: Vec<UserAccount>,
}

impl RbacTables {
    fn check_permission_references(&self, permission_ids: &[PermissionId]) -> AppResult<()> {
        match permission_ids.iter().find(|permission_id| {
            !self
                .permissions
                .iter()
                .any(|permission| permission.id() == **permission_id)
        }) {
            Some(missing) => Err(AppError::InvalidArgument(format!(
                "permission '{missing}' does not exist"
            ))),
            None => Ok(()),
        }
    }

    fn check_role_name(&self, candidate: &Role) -> AppResult<()> {
        let taken = self.roles.iter().any(|role| {
            role.id() != candidate.id()
                && !role.is_deleted()
                && role.tenant_id() == candidate.tenant_id()
                && role.name() == candidate.name()
        });

        if taken {
            return Err(AppError::Conflict(format!(
                "role name '{}' already exists",
                candidate.name()
            )));
        }

        Ok(())
    }

    fn check_group_name(&self, candidate: &PermissionGroup) -> AppResult<()> {
        let taken = !candidate.is_deleted()
            && self.groups.iter().any(|group| {
                group.id() != candidate.id()
                    && !group.is_deleted()
                    && group.name() == candidate.name()
            });

        if taken {
            return Err(AppError::Conflict(format!(
                "permission group name '{}' already exists",
                candidate.name()
            )));
        }

        Ok(())
    }

    fn check_permission_key(&self, candidate: &Permission) -> AppResult<()> {
        if self.permissions.iter().any(|permission| {
            permission.id() != candidate.id() && permission.key() == candidate.key()
        }) {
            return Err(AppError::Conflict(format!(
                "permission key '{}' already exists",
                candidate.key().as_str()
            )));
        }

        Ok(())
    }

    fn check_group_reference(&self, group_id: Option<PermissionGroupId>) -> AppResult<()> {
        match group_id {
            Some(group_id) if !self.groups.iter().any(|group| group.id() == group_id) => Err(
                AppError::InvalidArgument(format!("permission group '{group_id}' does not exist")),
            ),
            _ => Ok(()),
        }
    }
}

impl InMemoryRbacStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a directory user. Tenant management owns users,
    /// so this is the only write path for them.
    pub async fn upsert_user(&self, user: UserAccount) -> AppResult<()> {
        let mut state = self.state.write().await;

        if let Some(role_id) = user.role_id()
            && !state.roles.iter().any(|role| role.id() == role_id)
        {
            return Err(AppError::InvalidArgument(format!(
                "role '{role_id}' does not exist"
            )));
        }

        match state.users.iter_mut().find(|stored| stored.id() == user.id()) {
            Some(stored) => *stored = user,
            None => state.users.push(user),
        }

        Ok(())
    }
}

#[async_trait]
impl PermissionGroupRepository for InMemoryRbacStore {
    async fn insert_group(&self, group: PermissionGroup) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check_group_name(&group)?;
        state.groups.push(group);
        Ok(())
    }

    async fn find_group(&self, group_id: PermissionGroupId) -> AppResult<Option<PermissionGroup>> {
        Ok(self
            .state
            .read()
            .await
            .groups
            .iter()
            .find(|group| group.id() == group_id)
            .cloned())
    }

    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<PermissionGroup>> {
        Ok(self
            .state
            .read()
            .await
            .groups
            .iter()
            .find(|group| !group.is_deleted() && group.name() == name)
            .cloned())
    }

    async fn list_groups_by_ids(
        &self,
        group_ids: &[PermissionGroupId],
    ) -> AppResult<Vec<PermissionGroup>> {
        Ok(self
            .state
            .read()
            .await
            .groups
            .iter()
            .filter(|group| group_ids.contains(&group.id()))
            .cloned()
            .collect())
    }

    async fn list_live_groups(&self) -> AppResult<Vec<PermissionGroup>> {
        Ok(self
            .state
            .read()
            .await
            .groups
            .iter()
            .filter(|group| group.is_live())
            .cloned()
            .collect())
    }

    async fn save_group(&self, group: PermissionGroup) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check_group_name(&group)?;

        let group_id = group.id();
        let stored = state
            .groups
            .iter_mut()
            .find(|stored| stored.id() == group_id)
            .ok_or_else(|| AppError::NotFound(format!("permission group '{group_id}' was not found")))?;
        *stored = group;
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for InMemoryRbacStore {
    async fn insert_permission(&self, permission: Permission) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check_permission_key(&permission)?;
        state.check_group_reference(permission.group_id())?;
        state.permissions.push(permission);
        Ok(())
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .iter()
            .find(|permission| permission.id() == permission_id)
            .cloned())
    }

    async fn find_permission_by_key(&self, key: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .iter()
            .find(|permission| permission.key().as_str() == key)
            .cloned())
    }

    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .iter()
            .filter(|permission| permission_ids.contains(&permission.id()))
            .cloned()
            .collect())
    }

    async fn list_live_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .iter()
            .filter(|permission| permission.is_live())
            .cloned()
            .collect())
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check_permission_key(&permission)?;
        state.check_group_reference(permission.group_id())?;

        let permission_id = permission.id();
        let stored = state
            .permissions
            .iter_mut()
            .find(|stored| stored.id() == permission_id)
            .ok_or_else(|| AppError::NotFound(format!("permission '{permission_id}' was not found")))?;
        *stored = permission;
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacStore {
    async fn insert_role(&self, role: Role) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check_permission_references(role.permission_ids())?;
        state.check_role_name(&role)?;
        state.roles.push(role);
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .iter()
            .find(|role| role.id() == role_id)
            .cloned())
    }

    async fn find_role_by_name(
        &self,
        tenant_id: Option<TenantId>,
        name: &str,
        excluding: Option<RoleId>,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .iter()
            .find(|role| {
                !role.is_deleted()
                    && role.tenant_id() == tenant_id
                    && role.name() == name
                    && Some(role.id()) != excluding
            })
            .cloned())
    }

    async fn list_live_roles_for_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Role>> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .iter()
            .filter(|role| {
                role.is_live() && (role.is_predefined() || role.tenant_id() == Some(tenant_id))
            })
            .cloned()
            .collect())
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check_permission_references(role.permission_ids())?;
        state.check_role_name(&role)?;

        let role_id = role.id();
        let stored = state
            .roles
            .iter_mut()
            .find(|stored| stored.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        *stored = role;
        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Role> {
        let mut state = self.state.write().await;
        state.check_permission_references(&permission_ids)?;

        let stored = state
            .roles
            .iter_mut()
            .find(|stored| stored.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        stored.replace_permissions(permission_ids);
        Ok(stored.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|user| user.role_id() == Some(role_id)) {
            return Err(AppError::Conflict("role is in use".to_owned()));
        }

        let position = state
            .roles
            .iter()
            .position(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        state.roles.remove(position);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryRbacStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .iter()
            .find(|user| user.id() == user_id)
            .cloned())
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = self
            .state
            .read()
            .await
            .users
            .iter()
            .filter(|user| user.role_id() == Some(role_id))
            .count();

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("user count overflow: {error}")))
    }
}
