use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use warden_application::PermissionGroupRepository;
use warden_core::{AppError, AppResult, PermissionGroupId};
use warden_domain::PermissionGroup;

use crate::database_errors::{map_read_error, map_write_error};

/// PostgreSQL-backed permission group registry.
#[derive(Clone)]
pub struct PostgresPermissionGroupRepository {
    pool: PgPool,
}

impl PostgresPermissionGroupRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    is_active: bool,
    is_deleted: bool,
}

impl TryFrom<GroupRow> for PermissionGroup {
    type Error = AppError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        PermissionGroup::restore(
            PermissionGroupId::from_uuid(row.id),
            row.name,
            row.description,
            row.is_active,
            row.is_deleted,
        )
    }
}

fn into_groups(rows: Vec<GroupRow>) -> AppResult<Vec<PermissionGroup>> {
    rows.into_iter().map(PermissionGroup::try_from).collect()
}

#[async_trait]
impl PermissionGroupRepository for PostgresPermissionGroupRepository {
    async fn insert_group(&self, group: PermissionGroup) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permission_groups (id, name, description, is_active, is_deleted)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(group.id().as_uuid())
        .bind(group.name())
        .bind(group.description())
        .bind(group.is_active())
        .bind(group.is_deleted())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_write_error(error, "permission group name", "create permission group")
        })?;

        Ok(())
    }

    async fn find_group(&self, group_id: PermissionGroupId) -> AppResult<Option<PermissionGroup>> {
        sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, description, is_active, is_deleted
            FROM permission_groups
            WHERE id = $1
            "#,
        )
        .bind(group_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find permission group"))?
        .map(PermissionGroup::try_from)
        .transpose()
    }

    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<PermissionGroup>> {
        sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, description, is_active, is_deleted
            FROM permission_groups
            WHERE name = $1 AND NOT is_deleted
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find permission group by name"))?
        .map(PermissionGroup::try_from)
        .transpose()
    }

    async fn list_groups_by_ids(
        &self,
        group_ids: &[PermissionGroupId],
    ) -> AppResult<Vec<PermissionGroup>> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<uuid::Uuid> = group_ids.iter().map(PermissionGroupId::as_uuid).collect();
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, description, is_active, is_deleted
            FROM permission_groups
            WHERE id = ANY($1)
            ORDER BY seq
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list permission groups"))?;

        into_groups(rows)
    }

    async fn list_live_groups(&self) -> AppResult<Vec<PermissionGroup>> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, description, is_active, is_deleted
            FROM permission_groups
            WHERE is_active AND NOT is_deleted
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list permission groups"))?;

        into_groups(rows)
    }

    async fn save_group(&self, group: PermissionGroup) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE permission_groups
            SET name = $2,
                description = $3,
                is_active = $4,
                is_deleted = $5,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(group.id().as_uuid())
        .bind(group.name())
        .bind(group.description())
        .bind(group.is_active())
        .bind(group.is_deleted())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_write_error(error, "permission group name", "update permission group")
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission group '{}' was not found",
                group.id()
            )));
        }

        Ok(())
    }
}
