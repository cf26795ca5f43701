use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult, PermissionGroupId, PermissionId};

/// Colon-delimited capability key such as `administration:role:read`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Key granting platform-wide authority. Never grantable through role administration.
    pub const SUPER_ADMIN: &'static str = "tenant:admin:super";

    /// Key marking tenant administrators. Visible only to super admins.
    pub const TENANT_ADMIN: &'static str = "tenant:admin:admin";

    /// Creates a validated permission key.
    ///
    /// A key has at least two non-empty segments separated by `:`; segments use
    /// lowercase ASCII letters, digits, `_` and `-`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::InvalidArgument(
                "permission key must not be empty".to_owned(),
            ));
        }

        if !trimmed.contains(':') {
            return Err(AppError::InvalidArgument(format!(
                "permission key '{trimmed}' must be colon-delimited"
            )));
        }

        for segment in trimmed.split(':') {
            if segment.is_empty() {
                return Err(AppError::InvalidArgument(format!(
                    "permission key '{trimmed}' contains an empty segment"
                )));
            }

            if !segment.chars().all(|character| {
                character.is_ascii_lowercase()
                    || character.is_ascii_digit()
                    || character == '_'
                    || character == '-'
            }) {
                return Err(AppError::InvalidArgument(format!(
                    "permission key segment '{segment}' must be lowercase alphanumeric"
                )));
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this is the super-admin key.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.0 == Self::SUPER_ADMIN
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionKey> for String {
    fn from(value: PermissionKey) -> Self {
        value.0
    }
}

/// Atomic capability in the permission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    key: PermissionKey,
    description: String,
    group_id: Option<PermissionGroupId>,
    is_active: bool,
    is_deleted: bool,
}

impl Permission {
    /// Creates a new active permission.
    #[must_use]
    pub fn new(
        id: PermissionId,
        key: PermissionKey,
        description: impl Into<String>,
        group_id: Option<PermissionGroupId>,
    ) -> Self {
        Self {
            id,
            key,
            description: description.into(),
            group_id,
            is_active: true,
            is_deleted: false,
        }
    }

    /// Rebuilds a permission from persisted state.
    #[must_use]
    pub fn restore(
        id: PermissionId,
        key: PermissionKey,
        description: impl Into<String>,
        group_id: Option<PermissionGroupId>,
        is_active: bool,
        is_deleted: bool,
    ) -> Self {
        Self {
            id,
            key,
            description: description.into(),
            group_id,
            is_active,
            is_deleted,
        }
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the capability key.
    #[must_use]
    pub fn key(&self) -> &PermissionKey {
        &self.key
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the owning group, if any.
    #[must_use]
    pub fn group_id(&self) -> Option<PermissionGroupId> {
        self.group_id
    }

    /// Returns whether the permission is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns whether the permission has been soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns whether the permission participates in authorization decisions.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Replaces the capability key.
    pub fn set_key(&mut self, key: PermissionKey) {
        self.key = key;
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Moves the permission to another group, or out of any group.
    pub fn set_group_id(&mut self, group_id: Option<PermissionGroupId>) {
        self.group_id = group_id;
    }

    /// Toggles the active flag.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Marks the permission as soft-deleted.
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
    }
}
