//! Idempotent bootstrap of the permission catalog and predefined roles.

use std::sync::Arc;

use tracing::{debug, info};
use warden_core::{AppResult, PermissionGroupId, PermissionId};
use warden_domain::{Permission, PermissionKey};

use crate::{
    CreatePermissionGroupInput, CreatePermissionInput, CreateRoleInput, PermissionGroupRepository,
    PermissionGroupService, PermissionRepository, PermissionService, RoleRepository, RoleService,
};

/// Permission declared by a seed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSeed {
    /// Capability key.
    pub key: String,
    /// Human-readable description.
    pub description: String,
}

/// Group declared by a seed catalog, with its member permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSeed {
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Member permissions in display order.
    pub permissions: Vec<PermissionSeed>,
}

/// Selects which catalog permissions a predefined role receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePermissionRule {
    /// Every live permission.
    All,
    /// Every live permission except the listed keys.
    AllExcept(Vec<String>),
    /// Permissions having any key segment in the list.
    AnySegment(Vec<String>),
    /// No permissions.
    Nothing,
}

impl RolePermissionRule {
    fn matches(&self, key: &PermissionKey) -> bool {
        match self {
            Self::All => true,
            Self::AllExcept(excluded) => !excluded.iter().any(|value| value == key.as_str()),
            Self::AnySegment(segments) => key
                .as_str()
                .split(':')
                .any(|segment| segments.iter().any(|value| value == segment)),
            Self::Nothing => false,
        }
    }
}

/// Predefined role declared by a seed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedRoleSeed {
    /// Globally unique role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission selection applied to the seeded catalog.
    pub rule: RolePermissionRule,
}

/// Full seed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCatalog {
    /// Groups and their permissions.
    pub groups: Vec<GroupSeed>,
    /// Predefined roles, seeded after permissions.
    pub predefined_roles: Vec<PredefinedRoleSeed>,
}

/// Counts of records created by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSeedReport {
    /// Groups created.
    pub groups_created: usize,
    /// Permissions created.
    pub permissions_created: usize,
    /// Predefined roles created.
    pub roles_created: usize,
}

fn group(name: &str, description: &str, permissions: &[(&str, &str)]) -> GroupSeed {
    GroupSeed {
        name: name.to_owned(),
        description: description.to_owned(),
        permissions: permissions
            .iter()
            .map(|(key, description)| PermissionSeed {
                key: (*key).to_owned(),
                description: (*description).to_owned(),
            })
            .collect(),
    }
}

fn predefined(name: &str, description: &str, rule: RolePermissionRule) -> PredefinedRoleSeed {
    PredefinedRoleSeed {
        name: name.to_owned(),
        description: description.to_owned(),
        rule,
    }
}

impl Default for SeedCatalog {
    fn default() -> Self {
        Self {
            groups: vec![
                group(
                    "General",
                    "Everyday application access",
                    &[
                        ("dashboard:view", "View dashboard analytics"),
                        ("settings:manage", "Manage application settings"),
                        ("profile:edit", "Edit own user profile"),
                    ],
                ),
                group(
                    "User Management",
                    "Tenant user administration",
                    &[
                        ("user:create", "Create new users"),
                        ("user:view", "View user details"),
                        ("user:update", "Update user details"),
                        ("user:delete", "Delete users"),
                        ("role:assign", "Assign roles to users"),
                    ],
                ),
                group(
                    "Project Management",
                    "Project lifecycle",
                    &[
                        ("project:create", "Create new projects"),
                        ("project:view", "View project details"),
                        ("project:update", "Update project details"),
                        ("project:delete", "Delete projects"),
                        ("project:collaborator:add", "Add collaborators to projects"),
                    ],
                ),
                group(
                    "Administration",
                    "Role and permission administration",
                    &[
                        ("administration:permission_group:read", "View permission groups"),
                        ("administration:permission_group:create", "Create permission groups"),
                        ("administration:permission_group:update", "Update permission groups"),
                        ("administration:permission_group:delete", "Delete permission groups"),
                        ("administration:permission:read", "View permissions"),
                        ("administration:permission:create", "Create permissions"),
                        ("administration:permission:update", "Update permissions"),
                        ("administration:permission:delete", "Delete permissions"),
                        ("administration:role:read", "View roles"),
                        ("administration:role:create", "Create roles"),
                        ("administration:role:update", "Update roles and their permissions"),
                        ("administration:role:delete", "Delete roles"),
                    ],
                ),
                group(
                    "Tenant",
                    "Tenant-wide administrative privileges",
                    &[
                        (PermissionKey::SUPER_ADMIN, "Full control over the platform"),
                        (PermissionKey::TENANT_ADMIN, "Administer a tenant"),
                    ],
                ),
            ],
            predefined_roles: vec![
                predefined(
                    "Super Admin",
                    "Has full control over the system.",
                    RolePermissionRule::All,
                ),
                predefined(
                    "Admin",
                    "Manages users, projects, and settings within a tenant.",
                    RolePermissionRule::AllExcept(vec![PermissionKey::SUPER_ADMIN.to_owned()]),
                ),
                predefined(
                    "Viewer",
                    "Can view content and reports.",
                    RolePermissionRule::AnySegment(vec!["read".to_owned(), "view".to_owned()]),
                ),
                predefined(
                    "Guest",
                    "Limited access for external collaborators.",
                    RolePermissionRule::Nothing,
                ),
            ],
        }
    }
}

/// Seeds groups, permissions and predefined roles, skipping existing records.
#[derive(Clone)]
pub struct CatalogSeedService {
    group_service: PermissionGroupService,
    permission_service: PermissionService,
    role_service: RoleService,
    groups: Arc<dyn PermissionGroupRepository>,
    permissions: Arc<dyn PermissionRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl CatalogSeedService {
    /// Creates a new seeding service.
    #[must_use]
    pub fn new(
        group_service: PermissionGroupService,
        permission_service: PermissionService,
        role_service: RoleService,
        groups: Arc<dyn PermissionGroupRepository>,
        permissions: Arc<dyn PermissionRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            group_service,
            permission_service,
            role_service,
            groups,
            permissions,
            roles,
        }
    }

    /// Applies `catalog`. Records matched by name or key are left untouched.
    pub async fn seed(&self, catalog: &SeedCatalog) -> AppResult<CatalogSeedReport> {
        let mut report = CatalogSeedReport::default();

        for group_seed in &catalog.groups {
            let group_id = self.seed_group(group_seed, &mut report).await?;
            for permission_seed in &group_seed.permissions {
                self.seed_permission(permission_seed, group_id, &mut report)
                    .await?;
            }
        }

        let catalog_permissions = self.permissions.list_live_permissions().await?;
        for role_seed in &catalog.predefined_roles {
            self.seed_role(role_seed, &catalog_permissions, &mut report)
                .await?;
        }

        info!(
            groups_created = report.groups_created,
            permissions_created = report.permissions_created,
            roles_created = report.roles_created,
            "catalog seeded"
        );
        Ok(report)
    }

    async fn seed_group(
        &self,
        seed: &GroupSeed,
        report: &mut CatalogSeedReport,
    ) -> AppResult<PermissionGroupId> {
        if let Some(existing) = self.groups.find_group_by_name(seed.name.as_str()).await? {
            debug!(name = seed.name.as_str(), "permission group exists, skipping");
            return Ok(existing.id());
        }

        let group = self
            .group_service
            .create(CreatePermissionGroupInput {
                name: seed.name.clone(),
                description: Some(seed.description.clone()),
            })
            .await?;
        report.groups_created += 1;
        Ok(group.id())
    }

    async fn seed_permission(
        &self,
        seed: &PermissionSeed,
        group_id: PermissionGroupId,
        report: &mut CatalogSeedReport,
    ) -> AppResult<()> {
        if self
            .permissions
            .find_permission_by_key(seed.key.as_str())
            .await?
            .is_some()
        {
            debug!(key = seed.key.as_str(), "permission exists, skipping");
            return Ok(());
        }

        self.permission_service
            .create(CreatePermissionInput {
                key: seed.key.clone(),
                description: Some(seed.description.clone()),
                group_id: Some(group_id),
            })
            .await?;
        report.permissions_created += 1;
        Ok(())
    }

    async fn seed_role(
        &self,
        seed: &PredefinedRoleSeed,
        catalog: &[Permission],
        report: &mut CatalogSeedReport,
    ) -> AppResult<()> {
        if self
            .roles
            .find_role_by_name(None, seed.name.as_str(), None)
            .await?
            .is_some()
        {
            debug!(name = seed.name.as_str(), "predefined role exists, skipping");
            return Ok(());
        }

        let permissions: Vec<PermissionId> = catalog
            .iter()
            .filter(|permission| seed.rule.matches(permission.key()))
            .map(Permission::id)
            .collect();

        self.role_service
            .create_predefined(CreateRoleInput {
                name: seed.name.clone(),
                description: Some(seed.description.clone()),
                permissions,
            })
            .await?;
        report.roles_created += 1;
        Ok(())
    }
}
