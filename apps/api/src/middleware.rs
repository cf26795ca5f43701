use axum::extract::{Extension, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tower_sessions::Session;
use warden_core::{AppError, UserIdentity};

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Permission key a route group is gated on.
#[derive(Debug, Clone, Copy)]
pub struct RequiredPermission(pub &'static str);

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Re-resolves the caller's permissions on every request and rejects callers
/// missing the route's key.
pub async fn require_permission(
    State(state): State<AppState>,
    Extension(required): Extension<RequiredPermission>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = request
        .extensions()
        .get::<UserIdentity>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    state
        .authorization_service
        .require_permission(&identity, required.0)
        .await?;

    Ok(next.run(request).await)
}
