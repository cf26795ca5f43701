use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use warden_application::{
    AuthorizationService, CatalogSeedService, PermissionGroupRepository, PermissionGroupService,
    PermissionRepository, PermissionService, RoleRepository, RoleService, UserDirectory,
};
use warden_core::{AppResult, TenantId, UserId};
use warden_domain::UserAccount;
use warden_infrastructure::{
    InMemoryRbacStore, PostgresPermissionGroupRepository, PostgresPermissionRepository,
    PostgresRoleRepository, PostgresUserDirectory,
};

use crate::state::AppState;

const DEV_USER_ROLE: &str = "Super Admin";

/// Store handles behind every application port.
#[derive(Clone)]
pub struct RbacStores {
    pub groups: Arc<dyn PermissionGroupRepository>,
    pub permissions: Arc<dyn PermissionRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub kind: &'static str,
}

impl RbacStores {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            groups: Arc::new(PostgresPermissionGroupRepository::new(pool.clone())),
            permissions: Arc::new(PostgresPermissionRepository::new(pool.clone())),
            roles: Arc::new(PostgresRoleRepository::new(pool.clone())),
            users: Arc::new(PostgresUserDirectory::new(pool.clone())),
            kind: "postgres",
        }
    }

    pub fn in_memory(store: Arc<InMemoryRbacStore>) -> Self {
        Self {
            groups: store.clone(),
            permissions: store.clone(),
            roles: store.clone(),
            users: store,
            kind: "in_memory",
        }
    }
}

pub fn build_app_state(
    stores: RbacStores,
    bootstrap_token: String,
) -> (AppState, CatalogSeedService) {
    let authorization_service = AuthorizationService::new(
        stores.roles.clone(),
        stores.permissions.clone(),
        stores.groups.clone(),
        stores.users.clone(),
    );
    let role_service = RoleService::new(
        stores.roles.clone(),
        stores.users.clone(),
        authorization_service.clone(),
    );
    let permission_group_service =
        PermissionGroupService::new(stores.groups.clone(), stores.permissions.clone());
    let permission_service =
        PermissionService::new(stores.permissions.clone(), stores.groups.clone());

    let catalog_seed_service = CatalogSeedService::new(
        permission_group_service.clone(),
        permission_service.clone(),
        role_service.clone(),
        stores.groups,
        stores.permissions,
        stores.roles,
    );

    let state = AppState {
        authorization_service,
        role_service,
        permission_group_service,
        permission_service,
        user_directory: stores.users,
        bootstrap_token,
        store_kind: stores.kind,
    };

    (state, catalog_seed_service)
}

/// Creates a user in a fresh tenant holding the predefined super-admin role.
///
/// Only the in-memory store has no directory to bind sessions against, so
/// the API provisions one user there at startup.
pub async fn provision_dev_user(store: &InMemoryRbacStore) -> AppResult<UserAccount> {
    let role = store.find_role_by_name(None, DEV_USER_ROLE, None).await?;
    let user = UserAccount::new(
        UserId::new(),
        TenantId::new(),
        role.as_ref().map(|role| role.id()),
        "Development Admin",
    );
    store.upsert_user(user.clone()).await?;

    info!(
        user_id = %user.id(),
        tenant_id = %user.tenant_id(),
        has_role = role.is_some(),
        "in-memory development user provisioned"
    );
    Ok(user)
}
