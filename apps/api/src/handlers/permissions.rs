use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use warden_application::{CreatePermissionInput, UpdatePermissionInput};
use warden_core::PermissionId;

use crate::dto::{
    CreatePermissionRequest, PermissionDetailResponse, PermissionResponse,
    UpdatePermissionRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionDetailResponse>>> {
    let permissions = state
        .permission_service
        .list()
        .await?
        .into_iter()
        .map(PermissionDetailResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let input = CreatePermissionInput::try_from(payload)?;
    let permission = state.permission_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionDetailResponse>> {
    let permission_id: PermissionId = permission_id.parse()?;
    let permission = state.permission_service.get(permission_id).await?;

    Ok(Json(PermissionDetailResponse::from(permission)))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission_id: PermissionId = permission_id.parse()?;
    let input = UpdatePermissionInput::try_from(payload)?;
    let permission = state
        .permission_service
        .update(permission_id, input)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    let permission_id: PermissionId = permission_id.parse()?;
    state.permission_service.delete(permission_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
