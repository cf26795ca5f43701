use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_core::UserIdentity;
use warden_domain::PermissionSet;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}

/// Incoming payload binding an existing directory user to the session.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-bootstrap-request.ts"
)]
pub struct SessionBootstrapRequest {
    pub token: String,
    pub user_id: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub display_name: String,
    pub tenant_id: String,
    /// Keys the caller holds right now, sorted.
    pub permissions: Vec<String>,
}

impl UserIdentityResponse {
    /// Creates a response from the identity and its freshly resolved keys.
    #[must_use]
    pub fn from_identity_with_permissions(
        identity: UserIdentity,
        permissions: PermissionSet,
    ) -> Self {
        let mut permissions = permissions
            .iter()
            .map(ToOwned::to_owned)
            .collect::<Vec<_>>();
        permissions.sort();

        Self {
            user_id: identity.user_id().to_string(),
            display_name: identity.display_name().to_owned(),
            tenant_id: identity.tenant_id().to_string(),
            permissions,
        }
    }
}
