use async_trait::async_trait;

use warden_core::{AppResult, PermissionGroupId};
use warden_domain::{Permission, PermissionGroup};

/// Input payload for creating a permission group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionGroupInput {
    /// Display name, unique among non-deleted groups.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial update for a permission group. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePermissionGroupInput {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Group joined with its live member permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGroupWithPermissions {
    /// Group record.
    pub group: PermissionGroup,
    /// Active, non-deleted member permissions in catalog order.
    pub permissions: Vec<Permission>,
}

/// Repository port for permission groups.
///
/// Implementations enforce name uniqueness among non-deleted groups and
/// report violations as `AppError::Conflict`.
#[async_trait]
pub trait PermissionGroupRepository: Send + Sync {
    /// Inserts a new group.
    async fn insert_group(&self, group: PermissionGroup) -> AppResult<()>;

    /// Finds a group by id in any state.
    async fn find_group(&self, group_id: PermissionGroupId) -> AppResult<Option<PermissionGroup>>;

    /// Finds a non-deleted group by exact name.
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<PermissionGroup>>;

    /// Lists groups with the given ids in any state.
    async fn list_groups_by_ids(
        &self,
        group_ids: &[PermissionGroupId],
    ) -> AppResult<Vec<PermissionGroup>>;

    /// Lists active, non-deleted groups in creation order.
    async fn list_live_groups(&self) -> AppResult<Vec<PermissionGroup>>;

    /// Persists changes to an existing group.
    async fn save_group(&self, group: PermissionGroup) -> AppResult<()>;
}
