use std::sync::Arc;

use tracing::info;
use warden_core::{AppError, AppResult, NonEmptyString, RoleId, UserId, UserIdentity};
use warden_domain::{Role, RoleScope, UserAccount};

use crate::{
    AuthorizationService, CreateRoleInput, RoleRepository, RoleView, RoleWithPermissions,
    UpdateRoleInput, UserDirectory,
};


/// Application service for tenant role administration.
#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserDirectory>,
    authorization: AuthorizationService,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        users: Arc<dyn UserDirectory>,
        authorization: AuthorizationService,
    ) -> Self {
        Self {
            roles,
            users,
            authorization,
        }
    }

    /// Creates a tenant role owned by the creator's tenant.
    pub async fn create(
        &self,
        input: CreateRoleInput,
        creator_id: UserId,
    ) -> AppResult<RoleWithPermissions> {
        let creator = self.require_user(creator_id).await?;
        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description.unwrap_or_default(),
            input.permissions,
            RoleScope::Tenant {
                tenant_id: creator.tenant_id(),
                created_by: creator.id(),
            },
        )?;

        self.ensure_name_available(&role, None).await?;
        self.authorization
            .ensure_grantable(role.permission_ids())
            .await?;
        self.roles.insert_role(role.clone()).await?;

        info!(
            role_id = %role.id(),
            tenant_id = %creator.tenant_id(),
            actor = %creator_id,
            "role created"
        );
        self.authorization.populate(role).await
    }

    /// Creates a platform-global role. Only catalog seeding calls this.
    pub async fn create_predefined(&self, input: CreateRoleInput) -> AppResult<RoleWithPermissions> {
        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description.unwrap_or_default(),
            input.permissions,
            RoleScope::Predefined,
        )?;

        self.ensure_name_available(&role, None).await?;
        self.roles.insert_role(role.clone()).await?;

        info!(role_id = %role.id(), name = role.name(), "predefined role created");
        self.authorization.populate(role).await
    }

    /// Returns a live role with its permissions.
    pub async fn get(&self, role_id: RoleId) -> AppResult<RoleWithPermissions> {
        let role = self.require_live_role(role_id).await?;
        self.authorization.populate(role).await
    }

    /// Lists the roles the caller may see in its tenant.
    pub async fn list_for_tenant(&self, caller: &UserIdentity) -> AppResult<Vec<RoleView>> {
        self.authorization
            .visible_roles(caller.user_id(), caller.tenant_id())
            .await
    }

    /// Applies a partial update to a tenant role.
    ///
    /// The acting user must share a tenant with the role's creator.
    pub async fn update(
        &self,
        role_id: RoleId,
        input: UpdateRoleInput,
        acting_user_id: UserId,
    ) -> AppResult<RoleWithPermissions> {
        let acting = self.require_user(acting_user_id).await?;
        let mut role = self.require_live_role(role_id).await?;

        if role.is_predefined() {
            return Err(AppError::Forbidden(
                "predefined roles cannot be modified".to_owned(),
            ));
        }

        let creator_id = role.created_by().ok_or_else(|| {
            AppError::NotFound(format!("creator of role '{role_id}' was not found"))
        })?;
        let creator = self
            .users
            .find_user(creator_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("creator of role '{role_id}' was not found")))?;

        if creator.tenant_id() != acting.tenant_id() {
            return Err(AppError::Forbidden(
                "role belongs to another tenant".to_owned(),
            ));
        }

        if let Some(name) = input.name {
            let name = NonEmptyString::for_field("name", name)?;
            if name.as_str() != role.name() {
                role.rename(name);
                self.ensure_name_available(&role, Some(role_id)).await?;
            }
        }

        if let Some(description) = input.description {
            role.set_description(description);
        }

        if let Some(permissions) = input.permissions {
            if !permissions.is_empty() {
                self.authorization.ensure_grantable(&permissions).await?;
            }
            role.replace_permissions(permissions);
        }

        if let Some(is_active) = input.is_active {
            role.set_active(is_active);
        }

        self.roles.save_role(role.clone()).await?;

        info!(
            role_id = %role_id,
            tenant_id = %acting.tenant_id(),
            actor = %acting_user_id,
            "role updated"
        );
        self.authorization.populate(role).await
    }

    /// Physically removes an unreferenced tenant role.
    ///
    /// Only roles of the caller's own tenant may be removed; a role owned by
    /// another tenant is forbidden even when nothing references it.
    pub async fn delete(&self, role_id: RoleId, acting: &UserIdentity) -> AppResult<()> {
        let role = self
            .roles
            .find_role(role_id)
            .await?
            .filter(|role| !role.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        if role.is_predefined() {
            return Err(AppError::Forbidden(
                "predefined roles cannot be deleted".to_owned(),
            ));
        }

        if role.tenant_id() != Some(acting.tenant_id()) {
            return Err(AppError::Forbidden(
                "role belongs to another tenant".to_owned(),
            ));
        }

        if self.users.count_users_with_role(role_id).await? > 0 {
            return Err(AppError::Conflict("role is in use".to_owned()));
        }

        self.roles.delete_role(role_id).await?;

        info!(
            role_id = %role_id,
            tenant_id = %acting.tenant_id(),
            actor = %acting.user_id(),
            "role deleted"
        );
        Ok(())
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<UserAccount> {
        self.users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))
    }

    async fn require_live_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.roles
            .find_role(role_id)
            .await?
            .filter(Role::is_live)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    async fn ensure_name_available(&self, role: &Role, excluding: Option<RoleId>) -> AppResult<()> {
        let existing = self
            .roles
            .find_role_by_name(role.tenant_id(), role.name(), excluding)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "role name '{}' already exists",
                role.name()
            )));
        }

        Ok(())
    }
}
