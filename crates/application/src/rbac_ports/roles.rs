use async_trait::async_trait;

use warden_core::{AppResult, PermissionId, RoleId, TenantId};
use warden_domain::{Permission, Role};

/// Input payload for creating a role.
///
/// Scope fields are absent on purpose: tenant and creator always derive from
/// the creating user, and predefined roles are only created by catalog seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name, trimmed before use.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Permissions to attach.
    pub permissions: Vec<PermissionId>,
}

/// Partial update for a role. Scope fields are immutable and not representable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Full replacement permission list.
    pub permissions: Option<Vec<PermissionId>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Role with its referenced permission records populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleWithPermissions {
    /// Role record.
    pub role: Role,
    /// Non-deleted referenced permissions in role order.
    pub permissions: Vec<Permission>,
}

/// Role projection returned by tenant role listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleView {
    /// Role record.
    pub role: Role,
    /// Non-deleted referenced permissions in role order.
    pub permissions: Vec<Permission>,
    /// UI hint: caller created this tenant role.
    pub can_edit: bool,
    /// UI hint: caller created this tenant role.
    pub can_delete: bool,
}

/// Repository port for roles.
///
/// Implementations enforce `(tenant_id, name)` uniqueness among non-deleted
/// tenant roles and global name uniqueness among predefined roles, reporting
/// violations as `AppError::Conflict`. Unknown permission references are
/// rejected with `AppError::InvalidArgument`.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Inserts a new role.
    async fn insert_role(&self, role: Role) -> AppResult<()>;

    /// Finds a role by id in any state.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a non-deleted role by exact name within a scope.
    ///
    /// `tenant_id = None` searches predefined roles.
    async fn find_role_by_name(
        &self,
        tenant_id: Option<TenantId>,
        name: &str,
        excluding: Option<RoleId>,
    ) -> AppResult<Option<Role>>;

    /// Lists active, non-deleted roles that are predefined or owned by `tenant_id`.
    async fn list_live_roles_for_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Role>>;

    /// Persists changes to an existing role.
    async fn save_role(&self, role: Role) -> AppResult<()>;

    /// Replaces the full permission set of a role in one write and returns the updated role.
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Role>;

    /// Physically removes a role. Fails with `Conflict` when users still reference it.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;
}
