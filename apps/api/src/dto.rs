mod common;
mod permission_groups;
mod permissions;
mod roles;

pub use common::{HealthResponse, SessionBootstrapRequest, UserIdentityResponse};
pub use permission_groups::{
    CreatePermissionGroupRequest, PermissionGroupDetailResponse, PermissionGroupResponse,
    UpdatePermissionGroupRequest,
};
pub use permissions::{
    CreatePermissionRequest, PermissionDetailResponse, PermissionResponse,
    UpdatePermissionRequest,
};
pub use roles::{
    AssignRolePermissionsRequest, CreateRoleRequest, GroupViewResponse,
    PermissionAssignmentResponse, RolePermissionAssignmentResponse, RoleResponse,
    RoleViewResponse, UpdateRoleRequest, parse_permission_ids,
};
