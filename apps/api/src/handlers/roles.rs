use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use warden_application::{CreateRoleInput, UpdateRoleInput};
use warden_core::{RoleId, UserIdentity};

use crate::dto::{
    AssignRolePermissionsRequest, CreateRoleRequest, GroupViewResponse,
    RolePermissionAssignmentResponse, RoleResponse, RoleViewResponse, UpdateRoleRequest,
    parse_permission_ids,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleViewResponse>>> {
    let roles = state
        .role_service
        .list_for_tenant(&user)
        .await?
        .into_iter()
        .map(RoleViewResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let input = CreateRoleInput::try_from(payload)?;
    let role = state.role_service.create(input, user.user_id()).await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id: RoleId = role_id.parse()?;
    let role = state.role_service.get(role_id).await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id: RoleId = role_id.parse()?;
    let input = UpdateRoleInput::try_from(payload)?;
    let role = state
        .role_service
        .update(role_id, input, user.user_id())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    let role_id: RoleId = role_id.parse()?;
    state.role_service.delete(role_id, &user).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<AssignRolePermissionsRequest>,
) -> ApiResult<Json<RolePermissionAssignmentResponse>> {
    let role_id: RoleId = role_id.parse()?;
    let permission_ids = parse_permission_ids(payload.permissions)?;
    let role = state
        .authorization_service
        .assign_permissions(role_id, permission_ids)
        .await?;

    Ok(Json(RolePermissionAssignmentResponse::from(role)))
}

pub async fn role_permissions_grouped_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<Vec<GroupViewResponse>>> {
    let role_id: RoleId = role_id.parse()?;
    let groups = state
        .authorization_service
        .role_permissions_grouped(role_id)
        .await?
        .into_iter()
        .map(GroupViewResponse::from)
        .collect();

    Ok(Json(groups))
}
