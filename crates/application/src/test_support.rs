use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use warden_core::{
    AppError, AppResult, PermissionGroupId, PermissionId, RoleId, TenantId, UserId,
};
use warden_domain::{Permission, PermissionGroup, PermissionKey, Role, RoleScope, UserAccount};

use crate::{
    AuthorizationService, CatalogSeedService, PermissionGroupRepository, PermissionGroupService,
    PermissionRepository, PermissionService, RoleRepository, RoleService, UserDirectory,
};

/// Shared fake behind every port, with store-side uniqueness checks.
#[derive(Clone, Default)]
pub(crate) struct FakeRbacStore {
    state: Arc<FakeRbacState>,
}

#[derive(Default)]
struct FakeRbacState {
    groups: Mutex<Vec<PermissionGroup>>,
    permissions: Mutex<Vec<Permission>>,
    roles: Mutex<Vec<Role>>,
    users: Mutex<Vec<UserAccount>>,
    conflict_on_next_role_insert: AtomicBool,
}

impl FakeRbacStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn authorization_service(&self) -> AuthorizationService {
        AuthorizationService::new(
            self.state.clone(),
            self.state.clone(),
            self.state.clone(),
            self.state.clone(),
        )
    }

    pub(crate) fn role_service(&self) -> RoleService {
        RoleService::new(
            self.state.clone(),
            self.state.clone(),
            self.authorization_service(),
        )
    }

    pub(crate) fn permission_group_service(&self) -> PermissionGroupService {
        PermissionGroupService::new(self.state.clone(), self.state.clone())
    }

    pub(crate) fn permission_service(&self) -> PermissionService {
        PermissionService::new(self.state.clone(), self.state.clone())
    }

    pub(crate) fn catalog_seed_service(&self) -> CatalogSeedService {
        CatalogSeedService::new(
            self.permission_group_service(),
            self.permission_service(),
            self.role_service(),
            self.state.clone(),
            self.state.clone(),
            self.state.clone(),
        )
    }

    /// Simulates a concurrent writer winning the unique index race.
    pub(crate) fn fail_next_role_insert_with_conflict(&self) {
        self.state
            .conflict_on_next_role_insert
            .store(true, Ordering::SeqCst);
    }

    pub(crate) async fn seed_group(&self, name: &str) -> PermissionGroup {
        let Ok(group) = PermissionGroup::new(PermissionGroupId::new(), name, "") else {
            panic!("seed group should be valid");
        };
        self.state.groups.lock().await.push(group.clone());
        group
    }

    pub(crate) async fn seed_permission(
        &self,
        key: &str,
        group_id: Option<PermissionGroupId>,
    ) -> Permission {
        let Ok(key) = PermissionKey::new(key) else {
            panic!("seed key should be valid");
        };
        let permission = Permission::new(PermissionId::new(), key, "", group_id);
        self.state.permissions.lock().await.push(permission.clone());
        permission
    }

    pub(crate) async fn seed_tenant_role(
        &self,
        name: &str,
        tenant_id: TenantId,
        created_by: UserId,
        permission_ids: Vec<PermissionId>,
    ) -> Role {
        self.push_role(
            name,
            permission_ids,
            RoleScope::Tenant {
                tenant_id,
                created_by,
            },
        )
        .await
    }

    pub(crate) async fn seed_predefined_role(
        &self,
        name: &str,
        permission_ids: Vec<PermissionId>,
    ) -> Role {
        self.push_role(name, permission_ids, RoleScope::Predefined)
            .await
    }

    pub(crate) async fn seed_user(&self, tenant_id: TenantId, role_id: Option<RoleId>) -> UserId {
        let user_id = UserId::new();
        self.state
            .users
            .lock()
            .await
            .push(UserAccount::new(user_id, tenant_id, role_id, "Test User"));
        user_id
    }

    pub(crate) async fn set_user_role(&self, user_id: UserId, role_id: Option<RoleId>) {
        let mut users = self.state.users.lock().await;
        if let Some(user) = users.iter_mut().find(|user| user.id() == user_id) {
            *user = UserAccount::new(
                user.id(),
                user.tenant_id(),
                role_id,
                user.display_name().to_owned(),
            );
        }
    }

    pub(crate) async fn stored_role(&self, role_id: RoleId) -> Option<Role> {
        self.state
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.id() == role_id)
            .cloned()
    }

    pub(crate) async fn role_count(&self) -> usize {
        self.state.roles.lock().await.len()
    }

    pub(crate) async fn permission_count(&self) -> usize {
        self.state.permissions.lock().await.len()
    }

    pub(crate) async fn group_count(&self) -> usize {
        self.state.groups.lock().await.len()
    }

    async fn push_role(&self, name: &str, permission_ids: Vec<PermissionId>, scope: RoleScope) -> Role {
        let Ok(role) = Role::new(RoleId::new(), name, "", permission_ids, scope) else {
            panic!("seed role should be valid");
        };
        self.state.roles.lock().await.push(role.clone());
        role
    }
}

fn role_name_taken(roles: &[Role], candidate: &Role) -> bool {
    roles.iter().any(|role| {
        role.id() != candidate.id()
            && !role.is_deleted()
            && role.tenant_id() == candidate.tenant_id()
            && role.name() == candidate.name()
    })
}

async fn check_permission_references(
    permissions: &Mutex<Vec<Permission>>,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    let permissions = permissions.lock().await;
    for permission_id in permission_ids {
        if !permissions
            .iter()
            .any(|permission| permission.id() == *permission_id)
        {
            return Err(AppError::InvalidArgument(format!(
                "permission '{permission_id}' does not exist"
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl PermissionGroupRepository for FakeRbacState {
    async fn insert_group(&self, group: PermissionGroup) -> AppResult<()> {
        let mut groups = self.groups.lock().await;
        if groups
            .iter()
            .any(|stored| !stored.is_deleted() && stored.name() == group.name())
        {
            return Err(AppError::Conflict(
                "permission group name already exists".to_owned(),
            ));
        }
        groups.push(group);
        Ok(())
    }

    async fn find_group(&self, group_id: PermissionGroupId) -> AppResult<Option<PermissionGroup>> {
        Ok(self
            .groups
            .lock()
            .await
            .iter()
            .find(|group| group.id() == group_id)
            .cloned())
    }

    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<PermissionGroup>> {
        Ok(self
            .groups
            .lock()
            .await
            .iter()
            .find(|group| !group.is_deleted() && group.name() == name)
            .cloned())
    }

    async fn list_groups_by_ids(
        &self,
        group_ids: &[PermissionGroupId],
    ) -> AppResult<Vec<PermissionGroup>> {
        Ok(self
            .groups
            .lock()
            .await
            .iter()
            .filter(|group| group_ids.contains(&group.id()))
            .cloned()
            .collect())
    }

    async fn list_live_groups(&self) -> AppResult<Vec<PermissionGroup>> {
        Ok(self
            .groups
            .lock()
            .await
            .iter()
            .filter(|group| group.is_live())
            .cloned()
            .collect())
    }

    async fn save_group(&self, group: PermissionGroup) -> AppResult<()> {
        let mut groups = self.groups.lock().await;
        let Some(stored) = groups.iter_mut().find(|stored| stored.id() == group.id()) else {
            return Err(AppError::NotFound("permission group was not found".to_owned()));
        };
        *stored = group;
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for FakeRbacState {
    async fn insert_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        if permissions
            .iter()
            .any(|stored| stored.key() == permission.key())
        {
            return Err(AppError::Conflict("permission key already exists".to_owned()));
        }
        permissions.push(permission);
        Ok(())
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .find(|permission| permission.id() == permission_id)
            .cloned())
    }

    async fn find_permission_by_key(&self, key: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .find(|permission| permission.key().as_str() == key)
            .cloned())
    }

    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .filter(|permission| permission_ids.contains(&permission.id()))
            .cloned()
            .collect())
    }

    async fn list_live_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .filter(|permission| permission.is_live())
            .cloned()
            .collect())
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        if permissions
            .iter()
            .any(|stored| stored.id() != permission.id() && stored.key() == permission.key())
        {
            return Err(AppError::Conflict("permission key already exists".to_owned()));
        }
        let Some(stored) = permissions
            .iter_mut()
            .find(|stored| stored.id() == permission.id())
        else {
            return Err(AppError::NotFound("permission was not found".to_owned()));
        };
        *stored = permission;
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for FakeRbacState {
    async fn insert_role(&self, role: Role) -> AppResult<()> {
        if self
            .conflict_on_next_role_insert
            .swap(false, Ordering::SeqCst)
        {
            return Err(AppError::Conflict("role name already exists".to_owned()));
        }

        check_permission_references(&self.permissions, role.permission_ids()).await?;

        let mut roles = self.roles.lock().await;
        if role_name_taken(&roles, &role) {
            return Err(AppError::Conflict("role name already exists".to_owned()));
        }
        roles.push(role);
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
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
            .roles
            .lock()
            .await
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
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| {
                role.is_live() && (role.is_predefined() || role.tenant_id() == Some(tenant_id))
            })
            .cloned()
            .collect())
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        check_permission_references(&self.permissions, role.permission_ids()).await?;

        let mut roles = self.roles.lock().await;
        if role_name_taken(&roles, &role) {
            return Err(AppError::Conflict("role name already exists".to_owned()));
        }
        let Some(stored) = roles.iter_mut().find(|stored| stored.id() == role.id()) else {
            return Err(AppError::NotFound("role was not found".to_owned()));
        };
        *stored = role;
        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Role> {
        check_permission_references(&self.permissions, &permission_ids).await?;

        let mut roles = self.roles.lock().await;
        let Some(stored) = roles.iter_mut().find(|stored| stored.id() == role_id) else {
            return Err(AppError::NotFound("role was not found".to_owned()));
        };
        stored.replace_permissions(permission_ids);
        Ok(stored.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let users = self.users.lock().await;
        if users.iter().any(|user| user.role_id() == Some(role_id)) {
            return Err(AppError::Conflict("role is in use".to_owned()));
        }

        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.id() != role_id);
        if roles.len() == before {
            return Err(AppError::NotFound("role was not found".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for FakeRbacState {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id() == user_id)
            .cloned())
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = self
            .users
            .lock()
            .await
            .iter()
            .filter(|user| user.role_id() == Some(role_id))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
