use std::sync::Arc;

use warden_application::{
    AuthorizationService, PermissionGroupService, PermissionService, RoleService, UserDirectory,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub role_service: RoleService,
    pub permission_group_service: PermissionGroupService,
    pub permission_service: PermissionService,
    pub user_directory: Arc<dyn UserDirectory>,
    pub bootstrap_token: String,
    /// `"postgres"` or `"in_memory"`.
    pub store_kind: &'static str,
}
