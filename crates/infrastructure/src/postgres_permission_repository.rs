use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use warden_application::PermissionRepository;
use warden_core::{AppError, AppResult, PermissionGroupId, PermissionId};
use warden_domain::{Permission, PermissionKey};

use crate::database_errors::{map_read_error, map_write_error};

#[cfg(test)]
mod tests;

/// PostgreSQL-backed permission catalog.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    key: String,
    description: String,
    group_id: Option<uuid::Uuid>,
    is_active: bool,
    is_deleted: bool,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        Ok(Permission::restore(
            PermissionId::from_uuid(row.id),
            PermissionKey::new(row.key)?,
            row.description,
            row.group_id.map(PermissionGroupId::from_uuid),
            row.is_active,
            row.is_deleted,
        ))
    }
}

fn into_permissions(rows: Vec<PermissionRow>) -> AppResult<Vec<Permission>> {
    rows.into_iter().map(Permission::try_from).collect()
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn insert_permission(&self, permission: Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permissions (id, key, description, group_id, is_active, is_deleted)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.key().as_str())
        .bind(permission.description())
        .bind(permission.group_id().map(|group_id| group_id.as_uuid()))
        .bind(permission.is_active())
        .bind(permission.is_deleted())
        .execute(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "permission key", "create permission"))?;

        Ok(())
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, key, description, group_id, is_active, is_deleted
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find permission"))?
        .map(Permission::try_from)
        .transpose()
    }

    async fn find_permission_by_key(&self, key: &str) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, key, description, group_id, is_active, is_deleted
            FROM permissions
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find permission by key"))?
        .map(Permission::try_from)
        .transpose()
    }

    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<uuid::Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, key, description, group_id, is_active, is_deleted
            FROM permissions
            WHERE id = ANY($1)
            ORDER BY seq
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list permissions"))?;

        into_permissions(rows)
    }

    async fn list_live_permissions(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, key, description, group_id, is_active, is_deleted
            FROM permissions
            WHERE is_active AND NOT is_deleted
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list permissions"))?;

        into_permissions(rows)
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE permissions
            SET key = $2,
                description = $3,
                group_id = $4,
                is_active = $5,
                is_deleted = $6,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.key().as_str())
        .bind(permission.description())
        .bind(permission.group_id().map(|group_id| group_id.as_uuid()))
        .bind(permission.is_active())
        .bind(permission.is_deleted())
        .execute(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "permission key", "update permission"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.id()
            )));
        }

        Ok(())
    }
}
