use async_trait::async_trait;

use warden_core::{AppResult, RoleId, UserId};
use warden_domain::UserAccount;

/// Read-only port onto the user directory owned by tenant management.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by id.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Counts users currently referencing a role.
    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64>;
}
