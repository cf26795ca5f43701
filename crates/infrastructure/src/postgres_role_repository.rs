use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use warden_application::RoleRepository;
use warden_core::{AppError, AppResult, PermissionId, RoleId, TenantId, UserId};
use warden_domain::{Role, RoleScope};

use crate::database_errors::{map_read_error, map_role_delete_error, map_write_error};


/// PostgreSQL-backed role store.
///
/// Permission references live in `role_permissions` with an explicit
/// position so assignment order survives a round trip.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    is_predefined: bool,
    tenant_id: Option<uuid::Uuid>,
    created_by: Option<uuid::Uuid>,
    is_active: bool,
    is_deleted: bool,
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: uuid::Uuid,
    permission_id: uuid::Uuid,
}

const ROLE_COLUMNS: &str =
    "id, name, description, is_predefined, tenant_id, created_by, is_active, is_deleted";

fn scope_from_row(row: &RoleRow) -> AppResult<RoleScope> {
    if row.is_predefined {
        return Ok(RoleScope::Predefined);
    }

    match (row.tenant_id, row.created_by) {
        (Some(tenant_id), Some(created_by)) => Ok(RoleScope::Tenant {
            tenant_id: TenantId::from_uuid(tenant_id),
            created_by: UserId::from_uuid(created_by),
        }),
        _ => Err(AppError::Internal(format!(
            "role '{}' has an inconsistent scope",
            row.id
        ))),
    }
}

fn role_from_row(row: RoleRow, permission_ids: Vec<PermissionId>) -> AppResult<Role> {
    let scope = scope_from_row(&row)?;
    Role::restore(
        RoleId::from_uuid(row.id),
        row.name,
        row.description,
        permission_ids,
        scope,
        row.is_active,
        row.is_deleted,
    )
}

fn scope_columns(role: &Role) -> (bool, Option<uuid::Uuid>, Option<uuid::Uuid>) {
    match role.scope() {
        RoleScope::Predefined => (true, None, None),
        RoleScope::Tenant {
            tenant_id,
            created_by,
        } => (false, Some(tenant_id.as_uuid()), Some(created_by.as_uuid())),
    }
}

async fn begin(pool: &PgPool) -> AppResult<Transaction<'static, Postgres>> {
    pool.begin()
        .await
        .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}

async fn write_role_permissions(
    transaction: &mut Transaction<'_, Postgres>,
    role_id: RoleId,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id.as_uuid())
        .execute(&mut **transaction)
        .await
        .map_err(|error| map_read_error(error, "clear role permissions"))?;

    if permission_ids.is_empty() {
        return Ok(());
    }

    let ids: Vec<uuid::Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();
    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission_id, position)
        SELECT $1, assigned.permission_id, assigned.position
        FROM UNNEST($2::uuid[]) WITH ORDINALITY AS assigned(permission_id, position)
        "#,
    )
    .bind(role_id.as_uuid())
    .bind(ids)
    .execute(&mut **transaction)
    .await
    .map_err(|error| map_write_error(error, "role permission", "persist role permissions"))?;

    Ok(())
}

impl PostgresRoleRepository {
    async fn permission_ids_for(
        &self,
        role_ids: &[uuid::Uuid],
    ) -> AppResult<HashMap<uuid::Uuid, Vec<PermissionId>>> {
        if role_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT role_id, permission_id
            FROM role_permissions
            WHERE role_id = ANY($1)
            ORDER BY role_id, position
            "#,
        )
        .bind(role_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list role permissions"))?;

        let mut grouped: HashMap<uuid::Uuid, Vec<PermissionId>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.role_id)
                .or_default()
                .push(PermissionId::from_uuid(row.permission_id));
        }

        Ok(grouped)
    }

    async fn hydrate(&self, rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
        let role_ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
        let mut permissions = self.permission_ids_for(&role_ids).await?;

        rows.into_iter()
            .map(|row| {
                let permission_ids = permissions.remove(&row.id).unwrap_or_default();
                role_from_row(row, permission_ids)
            })
            .collect()
    }

    async fn hydrate_one(&self, row: Option<RoleRow>) -> AppResult<Option<Role>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn insert_role(&self, role: Role) -> AppResult<()> {
        let (is_predefined, tenant_id, created_by) = scope_columns(&role);
        let mut transaction = begin(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO roles (
                id, name, description, is_predefined, tenant_id, created_by, is_active, is_deleted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.description())
        .bind(is_predefined)
        .bind(tenant_id)
        .bind(created_by)
        .bind(role.is_active())
        .bind(role.is_deleted())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_write_error(error, "role name", "create role"))?;

        write_role_permissions(&mut transaction, role.id(), role.permission_ids()).await?;
        commit(transaction).await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"
        ))
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find role"))?;

        self.hydrate_one(row).await
    }

    async fn find_role_by_name(
        &self,
        tenant_id: Option<TenantId>,
        name: &str,
        excluding: Option<RoleId>,
    ) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles
            WHERE NOT is_deleted
                AND name = $2
                AND tenant_id IS NOT DISTINCT FROM $1
                AND ($3::uuid IS NULL OR id <> $3)
            LIMIT 1
            "#
        ))
        .bind(tenant_id.map(|tenant_id| tenant_id.as_uuid()))
        .bind(name)
        .bind(excluding.map(|role_id| role_id.as_uuid()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find role by name"))?;

        self.hydrate_one(row).await
    }

    async fn list_live_roles_for_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles
            WHERE is_active
                AND NOT is_deleted
                AND (is_predefined OR tenant_id = $1)
            ORDER BY seq
            "#
        ))
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list roles"))?;

        self.hydrate(rows).await
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        let mut transaction = begin(&self.pool).await?;

        let result = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2,
                description = $3,
                is_active = $4,
                is_deleted = $5,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.description())
        .bind(role.is_active())
        .bind(role.is_deleted())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_write_error(error, "role name", "update role"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id()
            )));
        }

        write_role_permissions(&mut transaction, role.id(), role.permission_ids()).await?;
        commit(transaction).await
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Role> {
        let mut transaction = begin(&self.pool).await?;

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1 FOR UPDATE"
        ))
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| map_read_error(error, "lock role"))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        let role = role_from_row(row, permission_ids)?;
        write_role_permissions(&mut transaction, role_id, role.permission_ids()).await?;

        sqlx::query("UPDATE roles SET updated_at = now() WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_read_error(error, "touch role"))?;

        commit(transaction).await?;
        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_role_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }
}
