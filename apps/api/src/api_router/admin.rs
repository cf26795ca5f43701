//! Administration routes, one sub-router per gating permission key.

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};

use crate::handlers::{permission_groups, permissions, roles};
use crate::middleware::{self, RequiredPermission};
use crate::state::AppState;

const GROUP_READ: &str = "administration:permission_group:read";
const GROUP_CREATE: &str = "administration:permission_group:create";
const GROUP_UPDATE: &str = "administration:permission_group:update";
const GROUP_DELETE: &str = "administration:permission_group:delete";

const PERMISSION_READ: &str = "administration:permission:read";
const PERMISSION_CREATE: &str = "administration:permission:create";
const PERMISSION_UPDATE: &str = "administration:permission:update";
const PERMISSION_DELETE: &str = "administration:permission:delete";

const ROLE_READ: &str = "administration:role:read";
const ROLE_CREATE: &str = "administration:role:create";
const ROLE_UPDATE: &str = "administration:role:update";
const ROLE_DELETE: &str = "administration:role:delete";

fn gated(
    app_state: AppState,
    permission: &'static str,
    routes: Router<AppState>,
) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(app_state, middleware::require_permission))
        .layer(axum::Extension(RequiredPermission(permission)))
}

pub(super) fn build_permission_group_routes(app_state: AppState) -> Router<AppState> {
    let read = Router::new()
        .route(
            "/api/permission-groups",
            get(permission_groups::list_permission_groups_handler),
        )
        .route(
            "/api/permission-groups/{group_id}",
            get(permission_groups::get_permission_group_handler),
        );
    let create = Router::new().route(
        "/api/permission-groups",
        post(permission_groups::create_permission_group_handler),
    );
    let update = Router::new().route(
        "/api/permission-groups/{group_id}",
        put(permission_groups::update_permission_group_handler),
    );
    let remove = Router::new().route(
        "/api/permission-groups/{group_id}",
        delete(permission_groups::delete_permission_group_handler),
    );

    gated(app_state.clone(), GROUP_READ, read)
        .merge(gated(app_state.clone(), GROUP_CREATE, create))
        .merge(gated(app_state.clone(), GROUP_UPDATE, update))
        .merge(gated(app_state, GROUP_DELETE, remove))
}

pub(super) fn build_permission_routes(app_state: AppState) -> Router<AppState> {
    let read = Router::new()
        .route(
            "/api/permissions",
            get(permissions::list_permissions_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(permissions::get_permission_handler),
        );
    let create = Router::new().route(
        "/api/permissions",
        post(permissions::create_permission_handler),
    );
    let update = Router::new().route(
        "/api/permissions/{permission_id}",
        put(permissions::update_permission_handler),
    );
    let remove = Router::new().route(
        "/api/permissions/{permission_id}",
        delete(permissions::delete_permission_handler),
    );

    gated(app_state.clone(), PERMISSION_READ, read)
        .merge(gated(app_state.clone(), PERMISSION_CREATE, create))
        .merge(gated(app_state.clone(), PERMISSION_UPDATE, update))
        .merge(gated(app_state, PERMISSION_DELETE, remove))
}

pub(super) fn build_role_routes(app_state: AppState) -> Router<AppState> {
    let read = Router::new()
        .route("/api/roles", get(roles::list_roles_handler))
        .route("/api/roles/{role_id}", get(roles::get_role_handler))
        .route(
            "/api/roles/{role_id}/permissions",
            get(roles::role_permissions_grouped_handler),
        );
    let create = Router::new().route("/api/roles", post(roles::create_role_handler));
    let update = Router::new()
        .route("/api/roles/{role_id}", put(roles::update_role_handler))
        .route(
            "/api/roles/{role_id}/permissions",
            put(roles::assign_role_permissions_handler),
        );
    let remove = Router::new().route("/api/roles/{role_id}", delete(roles::delete_role_handler));

    gated(app_state.clone(), ROLE_READ, read)
        .merge(gated(app_state.clone(), ROLE_CREATE, create))
        .merge(gated(app_state.clone(), ROLE_UPDATE, update))
        .merge(gated(app_state, ROLE_DELETE, remove))
}
