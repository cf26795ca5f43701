use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use warden_core::PermissionGroupId;

use crate::dto::{
    CreatePermissionGroupRequest, PermissionGroupDetailResponse, PermissionGroupResponse,
    UpdatePermissionGroupRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permission_groups_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionGroupDetailResponse>>> {
    let groups = state
        .permission_group_service
        .list()
        .await?
        .into_iter()
        .map(PermissionGroupDetailResponse::from)
        .collect();

    Ok(Json(groups))
}

pub async fn create_permission_group_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePermissionGroupRequest>,
) -> ApiResult<(StatusCode, Json<PermissionGroupResponse>)> {
    let group = state.permission_group_service.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(PermissionGroupResponse::from(group))))
}

pub async fn get_permission_group_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<Json<PermissionGroupDetailResponse>> {
    let group_id: PermissionGroupId = group_id.parse()?;
    let group = state.permission_group_service.get(group_id).await?;

    Ok(Json(PermissionGroupDetailResponse::from(group)))
}

pub async fn update_permission_group_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(payload): Json<UpdatePermissionGroupRequest>,
) -> ApiResult<Json<PermissionGroupResponse>> {
    let group_id: PermissionGroupId = group_id.parse()?;
    let group = state
        .permission_group_service
        .update(group_id, payload.into())
        .await?;

    Ok(Json(PermissionGroupResponse::from(group)))
}

pub async fn delete_permission_group_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<StatusCode> {
    let group_id: PermissionGroupId = group_id.parse()?;
    state.permission_group_service.delete(group_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
