use std::sync::Arc;

use tracing::{info, warn};
use warden_core::{AppError, AppResult, PermissionId, RoleId, UserId, UserIdentity};
use warden_domain::{PermissionKey, PermissionSet, Role, dedupe_permission_ids};

use crate::{
    PermissionGroupRepository, PermissionRepository, RoleRepository, RoleWithPermissions,
    UserDirectory,
};

mod grouping;
mod visibility;


/// Application service for authorization decisions over roles and permissions.
#[derive(Clone)]
pub struct AuthorizationService {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    groups: Arc<dyn PermissionGroupRepository>,
    users: Arc<dyn UserDirectory>,
}

enum SubjectResolution {
    UnknownSubject,
    NoRole,
    Resolved(PermissionSet),
}

impl AuthorizationService {
    /// Creates a new authorization service from repository implementations.
    #[must_use]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        groups: Arc<dyn PermissionGroupRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            roles,
            permissions,
            groups,
            users,
        }
    }

    /// Returns whether `subject` holds `required`. Exact key match, no wildcards.
    #[must_use]
    pub fn has_permission(subject: &PermissionSet, required: &str) -> bool {
        subject.contains(required)
    }

    /// Resolves the effective key set of a user from its current role.
    ///
    /// A user without a role, or whose role is inactive or deleted, holds no keys.
    pub async fn resolve_subject_permissions(&self, user_id: UserId) -> AppResult<PermissionSet> {
        match self.resolve_subject(user_id).await? {
            SubjectResolution::UnknownSubject => Err(AppError::NotFound(format!(
                "user '{user_id}' was not found"
            ))),
            SubjectResolution::NoRole => Ok(PermissionSet::new()),
            SubjectResolution::Resolved(keys) => Ok(keys),
        }
    }

    /// Ensures the caller currently holds `required`.
    ///
    /// Permissions are resolved from the store on every call. Only a caller
    /// without a role reference is unauthorized; a reference to an inactive,
    /// deleted or missing role resolves to no keys and is forbidden.
    pub async fn require_permission(
        &self,
        identity: &UserIdentity,
        required: &str,
    ) -> AppResult<()> {
        match self.resolve_subject(identity.user_id()).await? {
            SubjectResolution::UnknownSubject | SubjectResolution::NoRole => {
                warn!(
                    actor = %identity.user_id(),
                    permission = required,
                    "caller has no resolvable role"
                );
                Err(AppError::Unauthorized(
                    "caller has no resolvable role".to_owned(),
                ))
            }
            SubjectResolution::Resolved(keys) if Self::has_permission(&keys, required) => Ok(()),
            SubjectResolution::Resolved(_) => {
                warn!(
                    actor = %identity.user_id(),
                    tenant_id = %identity.tenant_id(),
                    permission = required,
                    "permission denied"
                );
                Err(AppError::Forbidden(format!(
                    "missing permission '{required}'"
                )))
            }
        }
    }

    /// Replaces the full permission set of a role in one store write.
    ///
    /// This primitive does not apply the super-admin grant guard that
    /// [`crate::RoleService`] applies on create and update.
    pub async fn assign_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Role> {
        if permission_ids.is_empty() {
            return Err(AppError::InvalidArgument(
                "permissions must not be empty".to_owned(),
            ));
        }

        let role = self
            .roles
            .find_role(role_id)
            .await?
            .filter(|role| !role.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        let role = self
            .roles
            .replace_role_permissions(role.id(), dedupe_permission_ids(permission_ids))
            .await?;

        info!(
            role_id = %role.id(),
            permission_count = role.permission_ids().len(),
            "role permissions replaced"
        );
        Ok(role)
    }

    /// Rejects permission lists that would grant the super-admin key.
    pub async fn ensure_grantable(&self, permission_ids: &[PermissionId]) -> AppResult<()> {
        if permission_ids.is_empty() {
            return Ok(());
        }

        let permissions = self
            .permissions
            .list_permissions_by_ids(permission_ids)
            .await?;

        if permissions
            .iter()
            .any(|permission| permission.key().is_super_admin())
        {
            return Err(AppError::Forbidden(format!(
                "not allowed to assign '{}'",
                PermissionKey::SUPER_ADMIN
            )));
        }

        Ok(())
    }

    /// Loads the non-deleted permissions a role references, in role order.
    pub(crate) async fn populate(&self, role: Role) -> AppResult<RoleWithPermissions> {
        let referenced = self
            .permissions
            .list_permissions_by_ids(role.permission_ids())
            .await?;

        let permissions = role
            .permission_ids()
            .iter()
            .filter_map(|permission_id| {
                referenced
                    .iter()
                    .find(|permission| permission.id() == *permission_id)
            })
            .filter(|permission| !permission.is_deleted())
            .cloned()
            .collect();

        Ok(RoleWithPermissions { role, permissions })
    }

    async fn resolve_subject(&self, user_id: UserId) -> AppResult<SubjectResolution> {
        let Some(user) = self.users.find_user(user_id).await? else {
            return Ok(SubjectResolution::UnknownSubject);
        };

        let Some(role_id) = user.role_id() else {
            return Ok(SubjectResolution::NoRole);
        };

        let Some(role) = self
            .roles
            .find_role(role_id)
            .await?
            .filter(Role::is_live)
        else {
            return Ok(SubjectResolution::Resolved(PermissionSet::new()));
        };

        let keys = self
            .permissions
            .list_permissions_by_ids(role.permission_ids())
            .await?
            .into_iter()
            .filter(|permission| permission.is_live())
            .map(|permission| permission.key().as_str().to_owned())
            .collect();

        Ok(SubjectResolution::Resolved(keys))
    }

    /// Resolves keys for listing decisions; unknown callers hold nothing.
    async fn caller_keys(&self, user_id: UserId) -> AppResult<PermissionSet> {
        match self.resolve_subject(user_id).await? {
            SubjectResolution::Resolved(keys) => Ok(keys),
            SubjectResolution::UnknownSubject | SubjectResolution::NoRole => {
                Ok(PermissionSet::new())
            }
        }
    }
}
