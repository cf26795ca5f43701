use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use warden_application::{CreatePermissionInput, PermissionWithGroup, UpdatePermissionInput};
use warden_core::{AppError, PermissionGroupId};
use warden_domain::Permission;

use super::PermissionGroupResponse;

/// Incoming payload for permission creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Incoming partial update for a permission.
///
/// `group_id` distinguishes an absent field (keep the group) from an explicit
/// `null` (detach from any group).
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-request.ts"
)]
pub struct UpdatePermissionRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    #[ts(optional)]
    pub group_id: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// API representation of a permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub key: String,
    pub description: String,
    pub group_id: Option<String>,
    pub is_active: bool,
}

/// API representation of a permission joined with its group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-detail-response.ts"
)]
pub struct PermissionDetailResponse {
    pub permission_id: String,
    pub key: String,
    pub description: String,
    pub is_active: bool,
    pub group: Option<PermissionGroupResponse>,
}

fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn parse_group_id(value: &str) -> Result<PermissionGroupId, AppError> {
    value.parse()
}

impl TryFrom<CreatePermissionRequest> for CreatePermissionInput {
    type Error = AppError;

    fn try_from(value: CreatePermissionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            key: value.key,
            description: value.description,
            group_id: value.group_id.as_deref().map(parse_group_id).transpose()?,
        })
    }
}

impl TryFrom<UpdatePermissionRequest> for UpdatePermissionInput {
    type Error = AppError;

    fn try_from(value: UpdatePermissionRequest) -> Result<Self, Self::Error> {
        let group_id = match value.group_id {
            Some(Some(group_id)) => Some(Some(parse_group_id(group_id.as_str())?)),
            Some(None) => Some(None),
            None => None,
        };

        Ok(Self {
            key: value.key,
            description: value.description,
            group_id,
            is_active: value.is_active,
        })
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission_id: value.id().to_string(),
            key: value.key().as_str().to_owned(),
            description: value.description().to_owned(),
            group_id: value.group_id().map(|group_id| group_id.to_string()),
            is_active: value.is_active(),
        }
    }
}

impl From<PermissionWithGroup> for PermissionDetailResponse {
    fn from(value: PermissionWithGroup) -> Self {
        Self {
            permission_id: value.permission.id().to_string(),
            key: value.permission.key().as_str().to_owned(),
            description: value.permission.description().to_owned(),
            is_active: value.permission.is_active(),
            group: value.group.map(PermissionGroupResponse::from),
        }
    }
}
