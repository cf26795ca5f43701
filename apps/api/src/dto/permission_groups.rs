use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::{
    CreatePermissionGroupInput, PermissionGroupWithPermissions, UpdatePermissionGroupInput,
};
use warden_domain::PermissionGroup;

use super::PermissionResponse;

/// Incoming payload for permission group creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-group-request.ts"
)]
pub struct CreatePermissionGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming partial update for a permission group.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-group-request.ts"
)]
pub struct UpdatePermissionGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// API representation of a permission group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-group-response.ts"
)]
pub struct PermissionGroupResponse {
    pub group_id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

/// API representation of a permission group with its member permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-group-detail-response.ts"
)]
pub struct PermissionGroupDetailResponse {
    pub group_id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub permissions: Vec<PermissionResponse>,
}

impl From<CreatePermissionGroupRequest> for CreatePermissionGroupInput {
    fn from(value: CreatePermissionGroupRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

impl From<UpdatePermissionGroupRequest> for UpdatePermissionGroupInput {
    fn from(value: UpdatePermissionGroupRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            is_active: value.is_active,
        }
    }
}

impl From<PermissionGroup> for PermissionGroupResponse {
    fn from(value: PermissionGroup) -> Self {
        Self {
            group_id: value.id().to_string(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            is_active: value.is_active(),
        }
    }
}

impl From<PermissionGroupWithPermissions> for PermissionGroupDetailResponse {
    fn from(value: PermissionGroupWithPermissions) -> Self {
        let PermissionGroupResponse {
            group_id,
            name,
            description,
            is_active,
        } = value.group.into();

        Self {
            group_id,
            name,
            description,
            is_active,
            permissions: value
                .permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}
