use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tower_sessions::Session;
use tracing::{info, warn};
use warden_core::{AppError, UserId, UserIdentity};

use crate::dto::SessionBootstrapRequest;
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

pub async fn session_bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SessionBootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        warn!("session bootstrap rejected: invalid token");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id: UserId = payload.user_id.parse()?;
    let user = state
        .user_directory
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("user '{user_id}' is not known")))?;

    let identity = UserIdentity::new(user.id(), user.display_name(), user.tenant_id());

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(actor = %identity.user_id(), tenant_id = %identity.tenant_id(), "session bound");
    Ok(StatusCode::NO_CONTENT)
}
