use async_trait::async_trait;

use warden_core::{AppResult, PermissionGroupId, PermissionId};
use warden_domain::{Permission, PermissionGroup};

/// Input payload for creating a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Colon-delimited capability key.
    pub key: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning group.
    pub group_id: Option<PermissionGroupId>,
}

/// Partial update for a permission. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePermissionInput {
    /// New capability key.
    pub key: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New owning group; `Some(None)` detaches the permission from its group.
    pub group_id: Option<Option<PermissionGroupId>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Permission joined with its owning group when resolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWithGroup {
    /// Permission record.
    pub permission: Permission,
    /// Owning group, if it still exists.
    pub group: Option<PermissionGroup>,
}

/// Repository port for the permission catalog.
///
/// Implementations enforce key uniqueness across every row, soft-deleted
/// included, and report violations as `AppError::Conflict`.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Inserts a new permission.
    async fn insert_permission(&self, permission: Permission) -> AppResult<()>;

    /// Finds a permission by id in any state.
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>>;

    /// Finds a permission by key in any state.
    async fn find_permission_by_key(&self, key: &str) -> AppResult<Option<Permission>>;

    /// Lists permissions with the given ids in any state, in catalog order.
    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>>;

    /// Lists active, non-deleted permissions in catalog order.
    async fn list_live_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Persists changes to an existing permission.
    async fn save_permission(&self, permission: Permission) -> AppResult<()>;
}
