use serde::{Deserialize, Serialize};
use warden_core::{RoleId, TenantId, UserId};

/// Directory record consumed by the authorization core.
///
/// Users are owned by tenant management; only the tenant and role links matter here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    id: UserId,
    tenant_id: TenantId,
    role_id: Option<RoleId>,
    display_name: String,
}

impl UserAccount {
    /// Creates a directory record.
    #[must_use]
    pub fn new(
        id: UserId,
        tenant_id: TenantId,
        role_id: Option<RoleId>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            role_id,
            display_name: display_name.into(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the tenant the user currently belongs to.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the single role held by the user, if any.
    #[must_use]
    pub fn role_id(&self) -> Option<RoleId> {
        self.role_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}
