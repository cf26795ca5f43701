//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod database_errors;
mod in_memory_rbac_store;
mod postgres_permission_group_repository;
mod postgres_permission_repository;
mod postgres_role_repository;
mod postgres_user_directory;

#[cfg(test)]
mod postgres_test_support;

pub use in_memory_rbac_store::InMemoryRbacStore;
pub use postgres_permission_group_repository::PostgresPermissionGroupRepository;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_user_directory::PostgresUserDirectory;
