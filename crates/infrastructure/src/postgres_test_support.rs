use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use warden_core::{RoleId, TenantId, UserId};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres rbac tests: {error}");
    }

    Some(pool)
}

/// Returns a name unlikely to collide with rows left by earlier runs.
pub(crate) fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

pub(crate) async fn insert_user(
    pool: &PgPool,
    tenant_id: TenantId,
    role_id: Option<RoleId>,
) -> UserId {
    let user_id = UserId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO users (id, tenant_id, role_id, display_name)
        VALUES ($1, $2, $3, 'Test User')
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(tenant_id.as_uuid())
    .bind(role_id.map(|role_id| role_id.as_uuid()))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}
