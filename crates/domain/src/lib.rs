//! Domain entities and invariants for tenant-scoped RBAC.

#![forbid(unsafe_code)]

mod permission;
mod permission_group;
mod permission_set;
pub mod permission_view;
mod role;
mod user;

pub use permission::{Permission, PermissionKey};
pub use permission_group::PermissionGroup;
pub use permission_set::{PermissionSet, is_role_visible_to};
pub use permission_view::{GroupBucket, GroupView, PermissionAssignment, PermissionBucket};
pub use role::{Role, RoleScope, dedupe_permission_ids};
pub use user::UserAccount;
