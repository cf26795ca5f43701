use serde::{Deserialize, Serialize};
use warden_core::{AppResult, NonEmptyString, PermissionGroupId};

/// Display-only bucket of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    id: PermissionGroupId,
    name: NonEmptyString,
    description: String,
    is_active: bool,
    is_deleted: bool,
}

impl PermissionGroup {
    /// Creates a new active group with a validated name.
    pub fn new(
        id: PermissionGroupId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("name", name)?,
            description: description.into(),
            is_active: true,
            is_deleted: false,
        })
    }

    /// Rebuilds a group from persisted state.
    pub fn restore(
        id: PermissionGroupId,
        name: impl Into<String>,
        description: impl Into<String>,
        is_active: bool,
        is_deleted: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("name", name)?,
            description: description.into(),
            is_active,
            is_deleted,
        })
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> PermissionGroupId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns whether the group is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns whether the group has been soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns whether the group is active and not deleted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Renames the group.
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

    /// Marks the group as soft-deleted.
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
    }
}
