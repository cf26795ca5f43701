use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
                    AppError::InvalidArgument(format!("invalid {} '{value}': {error}", $label))
                })
            }
        }
    };
}

uuid_identifier!(
    /// Tenant identifier used as the partition key for tenant-owned resources.
    TenantId,
    "tenant id"
);
uuid_identifier!(
    /// User identifier resolved from the user directory.
    UserId,
    "user id"
);
uuid_identifier!(
    /// Role identifier.
    RoleId,
    "role id"
);
uuid_identifier!(
    /// Permission identifier.
    PermissionId,
    "permission id"
);
uuid_identifier!(
    /// Permission group identifier.
    PermissionGroupId,
    "permission group id"
);

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{RoleId, TenantId};

    #[test]
    fn tenant_id_formats_as_uuid() {
        let tenant_id = TenantId::new();
        assert_eq!(tenant_id.to_string().len(), 36);
    }

    #[test]
    fn role_id_parses_its_display_form() {
        let role_id = RoleId::new();
        let parsed = RoleId::from_str(role_id.to_string().as_str());
        assert_eq!(parsed.ok(), Some(role_id));
    }

    #[test]
    fn malformed_identifier_is_invalid_argument() {
        let parsed = RoleId::from_str("not-a-uuid");
        assert!(matches!(
            parsed,
            Err(crate::AppError::InvalidArgument(message)) if message.contains("role id")
        ));
    }
}
