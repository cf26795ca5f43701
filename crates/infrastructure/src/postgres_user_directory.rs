use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use warden_application::UserDirectory;
use warden_core::{AppError, AppResult, RoleId, TenantId, UserId};
use warden_domain::UserAccount;

use crate::database_errors::map_read_error;

/// Read-only view of the `users` table maintained by tenant management.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    role_id: Option<uuid::Uuid>,
    display_name: String,
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, tenant_id, role_id, display_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find user"))?;

        Ok(row.map(|row| {
            UserAccount::new(
                UserId::from_uuid(row.id),
                TenantId::from_uuid(row.tenant_id),
                row.role_id.map(RoleId::from_uuid),
                row.display_name,
            )
        }))
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "count role users"))?;

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid user count {count}: {error}")))
    }
}
