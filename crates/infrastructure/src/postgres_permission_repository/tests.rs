use warden_application::{PermissionGroupRepository, PermissionRepository};
use warden_core::{AppError, PermissionGroupId, PermissionId};
use warden_domain::{Permission, PermissionGroup, PermissionKey};

use crate::PostgresPermissionGroupRepository;
use crate::postgres_test_support::{test_pool, unique};

use super::PostgresPermissionRepository;

fn permission(key: &str, group_id: Option<PermissionGroupId>) -> Permission {
    let Ok(key) = PermissionKey::new(key) else {
        panic!("test key should be valid");
    };
    Permission::new(PermissionId::new(), key, "test permission", group_id)
}

#[tokio::test]
async fn permission_keys_conflict_even_after_soft_delete() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionRepository::new(pool);
    let key = format!("{}:create", unique("widget").replace('-', "_"));
    let mut original = permission(key.as_str(), None);

    assert!(repository.insert_permission(original.clone()).await.is_ok());
    original.mark_deleted();
    assert!(repository.save_permission(original).await.is_ok());

    let duplicate = repository
        .insert_permission(permission(key.as_str(), None))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let found = repository.find_permission_by_key(key.as_str()).await;
    assert!(matches!(found, Ok(Some(stored)) if stored.is_deleted()));
}

#[tokio::test]
async fn unknown_group_reference_is_invalid() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionRepository::new(pool);
    let key = format!("{}:view", unique("orphan").replace('-', "_"));

    let result = repository
        .insert_permission(permission(key.as_str(), Some(PermissionGroupId::new())))
        .await;

    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}

#[tokio::test]
async fn group_names_are_unique_among_live_groups() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let groups = PostgresPermissionGroupRepository::new(pool.clone());
    let permissions = PostgresPermissionRepository::new(pool);
    let name = unique("General");

    let Ok(mut group) = PermissionGroup::new(PermissionGroupId::new(), name.as_str(), "") else {
        panic!("group should be valid");
    };
    assert!(groups.insert_group(group.clone()).await.is_ok());

    let Ok(duplicate) = PermissionGroup::new(PermissionGroupId::new(), name.as_str(), "") else {
        panic!("group should be valid");
    };
    assert!(matches!(
        groups.insert_group(duplicate.clone()).await,
        Err(AppError::Conflict(_))
    ));

    let key = format!("{}:view", unique("member").replace('-', "_"));
    let member = permission(key.as_str(), Some(group.id()));
    assert!(permissions.insert_permission(member.clone()).await.is_ok());
    let listed = permissions.list_permissions_by_ids(&[member.id()]).await;
    assert!(matches!(listed, Ok(rows) if rows.len() == 1 && rows[0].group_id() == Some(group.id())));

    group.mark_deleted();
    assert!(groups.save_group(group).await.is_ok());
    assert!(groups.insert_group(duplicate).await.is_ok());
}
