use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use warden_core::{AppResult, NonEmptyString, PermissionId, RoleId, TenantId, UserId};

/// Ownership scope of a role, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleScope {
    /// Platform-global role not owned by any tenant. Immutable.
    Predefined,
    /// Role owned by one tenant and created by one of its users.
    Tenant {
        /// Owning tenant, derived from the creator.
        tenant_id: TenantId,
        /// Creating user.
        created_by: UserId,
    },
}

/// Named bundle of permission references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: String,
    permission_ids: Vec<PermissionId>,
    scope: RoleScope,
    is_active: bool,
    is_deleted: bool,
}

impl Role {
    /// Creates a new active role. The name is trimmed and duplicate permission ids collapse.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        permission_ids: Vec<PermissionId>,
        scope: RoleScope,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("name", name)?,
            description: description.into(),
            permission_ids: dedupe_permission_ids(permission_ids),
            scope,
            is_active: true,
            is_deleted: false,
        })
    }

    /// Rebuilds a role from persisted state.
    pub fn restore(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        permission_ids: Vec<PermissionId>,
        scope: RoleScope,
        is_active: bool,
        is_deleted: bool,
    ) -> AppResult<Self> {
        let mut role = Self::new(id, name, description, permission_ids, scope)?;
        role.is_active = is_active;
        role.is_deleted = is_deleted;
        Ok(role)
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the trimmed role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns assigned permission ids in assignment order.
    #[must_use]
    pub fn permission_ids(&self) -> &[PermissionId] {
        &self.permission_ids
    }

    /// Returns the ownership scope.
    #[must_use]
    pub fn scope(&self) -> RoleScope {
        self.scope
    }

    /// Returns whether the role is platform-global.
    #[must_use]
    pub fn is_predefined(&self) -> bool {
        matches!(self.scope, RoleScope::Predefined)
    }

    /// Returns the owning tenant for tenant roles.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self.scope {
            RoleScope::Predefined => None,
            RoleScope::Tenant { tenant_id, .. } => Some(tenant_id),
        }
    }

    /// Returns the creator for tenant roles.
    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        match self.scope {
            RoleScope::Predefined => None,
            RoleScope::Tenant { created_by, .. } => Some(created_by),
        }
    }

    /// Returns whether the role is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns whether the role is flagged deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns whether the role is active and not deleted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Returns whether `user_id` created this tenant role.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.created_by() == Some(user_id)
    }

    /// Renames the role.
    pub fn rename(&mut self, name: NonEmptyString) {
        self.name = name;
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Toggles the active flag.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Replaces the full permission set. Duplicates collapse keeping first occurrence.
    pub fn replace_permissions(&mut self, permission_ids: Vec<PermissionId>) {
        self.permission_ids = dedupe_permission_ids(permission_ids);
    }
}

/// Removes repeated ids while keeping the first occurrence order.
#[must_use]
pub fn dedupe_permission_ids(permission_ids: Vec<PermissionId>) -> Vec<PermissionId> {
    let mut seen = HashSet::with_capacity(permission_ids.len());
    permission_ids
        .into_iter()
        .filter(|permission_id| seen.insert(*permission_id))
        .collect()
}
