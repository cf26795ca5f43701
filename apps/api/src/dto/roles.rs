use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::{CreateRoleInput, RoleView, RoleWithPermissions, UpdateRoleInput};
use warden_core::{AppError, PermissionId};
use warden_domain::{GroupView, PermissionAssignment, Role};

use super::PermissionResponse;

/// Incoming payload for tenant role creation.
///
/// Tenant, creator and the predefined flag are derived server side and have
/// no field here.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Incoming partial update for a tenant role.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Incoming payload replacing a role's permission set.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-permissions-request.ts"
)]
pub struct AssignRolePermissionsRequest {
    pub permissions: Vec<String>,
}

/// API representation of a role with its permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: String,
    pub is_predefined: bool,
    pub is_active: bool,
    pub tenant_id: Option<String>,
    pub created_by: Option<String>,
    pub permissions: Vec<PermissionResponse>,
}

/// API representation of a role as listed for a caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-view-response.ts"
)]
pub struct RoleViewResponse {
    #[serde(flatten)]
    pub role: RoleResponse,
    pub can_edit: bool,
    pub can_delete: bool,
}

/// Result of replacing a role's permission set.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permission-assignment-response.ts"
)]
pub struct RolePermissionAssignmentResponse {
    pub role_id: String,
    pub permission_ids: Vec<String>,
}

/// One permission in a grouped role view.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-assignment-response.ts"
)]
pub struct PermissionAssignmentResponse {
    pub permission_id: String,
    pub key: String,
    pub description: String,
    pub assigned: bool,
}

/// One group bucket in a grouped role view.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-view-response.ts"
)]
pub struct GroupViewResponse {
    /// Group id, or `"ungrouped"` for permissions without a group.
    pub group_id: String,
    pub group_name: Option<String>,
    pub permissions: Vec<PermissionAssignmentResponse>,
}

/// Parses transport permission ids, failing on the first malformed value.
pub fn parse_permission_ids(values: Vec<String>) -> Result<Vec<PermissionId>, AppError> {
    values
        .iter()
        .map(|value| value.parse::<PermissionId>())
        .collect()
}

impl TryFrom<CreateRoleRequest> for CreateRoleInput {
    type Error = AppError;

    fn try_from(value: CreateRoleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            description: value.description,
            permissions: parse_permission_ids(value.permissions)?,
        })
    }
}

impl TryFrom<UpdateRoleRequest> for UpdateRoleInput {
    type Error = AppError;

    fn try_from(value: UpdateRoleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            description: value.description,
            permissions: value.permissions.map(parse_permission_ids).transpose()?,
            is_active: value.is_active,
        })
    }
}

impl From<RoleWithPermissions> for RoleResponse {
    fn from(value: RoleWithPermissions) -> Self {
        let RoleWithPermissions { role, permissions } = value;

        Self {
            role_id: role.id().to_string(),
            name: role.name().to_owned(),
            description: role.description().to_owned(),
            is_predefined: role.is_predefined(),
            is_active: role.is_active(),
            tenant_id: role.tenant_id().map(|tenant_id| tenant_id.to_string()),
            created_by: role.created_by().map(|user_id| user_id.to_string()),
            permissions: permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

impl From<RoleView> for RoleViewResponse {
    fn from(value: RoleView) -> Self {
        Self {
            role: RoleResponse::from(RoleWithPermissions {
                role: value.role,
                permissions: value.permissions,
            }),
            can_edit: value.can_edit,
            can_delete: value.can_delete,
        }
    }
}

impl From<Role> for RolePermissionAssignmentResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            permission_ids: value
                .permission_ids()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl From<PermissionAssignment> for PermissionAssignmentResponse {
    fn from(value: PermissionAssignment) -> Self {
        Self {
            permission_id: value.permission_id.to_string(),
            key: value.key.as_str().to_owned(),
            description: value.description,
            assigned: value.assigned,
        }
    }
}

impl From<GroupView> for GroupViewResponse {
    fn from(value: GroupView) -> Self {
        Self {
            group_id: value.bucket.as_transport(),
            group_name: value.group_name,
            permissions: value
                .permissions
                .into_iter()
                .map(PermissionAssignmentResponse::from)
                .collect(),
        }
    }
}
