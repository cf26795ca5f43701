//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod catalog_seed_service;
mod permission_group_service;
mod permission_service;
mod rbac_ports;
mod role_service;

#[cfg(test)]
mod test_support;

pub use authorization_service::AuthorizationService;
pub use catalog_seed_service::{
    CatalogSeedReport, CatalogSeedService, GroupSeed, PermissionSeed, PredefinedRoleSeed,
    RolePermissionRule, SeedCatalog,
};
pub use permission_group_service::PermissionGroupService;
pub use permission_service::PermissionService;
pub use rbac_ports::{
    CreatePermissionGroupInput, CreatePermissionInput, CreateRoleInput, PermissionGroupRepository,
    PermissionGroupWithPermissions, PermissionRepository, PermissionWithGroup, RoleRepository,
    RoleView, RoleWithPermissions, UpdatePermissionGroupInput, UpdatePermissionInput,
    UpdateRoleInput, UserDirectory,
};
pub use role_service::RoleService;
