mod permission_groups;
mod permissions;
mod roles;
mod users;

pub use permission_groups::{
    CreatePermissionGroupInput, PermissionGroupRepository, PermissionGroupWithPermissions,
    UpdatePermissionGroupInput,
};
pub use permissions::{
    CreatePermissionInput, PermissionRepository, PermissionWithGroup, UpdatePermissionInput,
};
pub use roles::{CreateRoleInput, RoleRepository, RoleView, RoleWithPermissions, UpdateRoleInput};
pub use users::UserDirectory;
