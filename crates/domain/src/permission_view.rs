//! Grouped permission view used when editing a role.
//!
//! Built in two passes over immutable snapshots: [`bucket_permissions`] groups
//! the catalog scan by owning group, then [`label_buckets`] resolves display
//! names. Bucket order and member order follow the scan order.

use std::collections::{HashMap, HashSet};

use warden_core::{PermissionGroupId, PermissionId};

use crate::{Permission, PermissionGroup, PermissionKey};

/// Identifier of the synthetic bucket holding permissions without a group.
pub const UNGROUPED_BUCKET: &str = "ungrouped";

/// Bucket a permission falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBucket {
    /// Permission references a group id.
    Group(PermissionGroupId),
    /// Permission has no group reference.
    Ungrouped,
}

impl GroupBucket {
    /// Returns the referenced group id, if any.
    #[must_use]
    pub fn group_id(&self) -> Option<PermissionGroupId> {
        match self {
            Self::Group(group_id) => Some(*group_id),
            Self::Ungrouped => None,
        }
    }

    /// Returns the transport identifier of the bucket.
    #[must_use]
    pub fn as_transport(&self) -> String {
        match self {
            Self::Group(group_id) => group_id.to_string(),
            Self::Ungrouped => UNGROUPED_BUCKET.to_owned(),
        }
    }
}

/// One permission annotated with its assignment status relative to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionAssignment {
    /// Permission identifier.
    pub permission_id: PermissionId,
    /// Capability key.
    pub key: PermissionKey,
    /// Human-readable description.
    pub description: String,
    /// Whether the role currently holds the permission.
    pub assigned: bool,
}

/// First-pass output: permissions grouped by bucket, not yet labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionBucket {
    /// Bucket identity.
    pub bucket: GroupBucket,
    /// Members in scan order.
    pub permissions: Vec<PermissionAssignment>,
}

/// Labelled group in the final view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    /// Bucket identity.
    pub bucket: GroupBucket,
    /// Display name, absent for the ungrouped bucket or unresolvable groups.
    pub group_name: Option<String>,
    /// Members in scan order.
    pub permissions: Vec<PermissionAssignment>,
}

/// Groups `permissions` by owning group, preserving first-seen bucket order.
#[must_use]
pub fn bucket_permissions(
    permissions: &[Permission],
    assigned: &HashSet<PermissionId>,
) -> Vec<PermissionBucket> {
    let mut buckets: Vec<PermissionBucket> = Vec::new();
    let mut positions: HashMap<GroupBucket, usize> = HashMap::new();

    for permission in permissions {
        let bucket = permission
            .group_id()
            .map(GroupBucket::Group)
            .unwrap_or(GroupBucket::Ungrouped);

        let position = *positions.entry(bucket).or_insert_with(|| {
            buckets.push(PermissionBucket {
                bucket,
                permissions: Vec::new(),
            });
            buckets.len() - 1
        });

        buckets[position].permissions.push(PermissionAssignment {
            permission_id: permission.id(),
            key: permission.key().clone(),
            description: permission.description().to_owned(),
            assigned: assigned.contains(&permission.id()),
        });
    }

    buckets
}

/// Returns the distinct group ids referenced by `buckets`, in bucket order.
#[must_use]
pub fn referenced_group_ids(buckets: &[PermissionBucket]) -> Vec<PermissionGroupId> {
    buckets
        .iter()
        .filter_map(|bucket| bucket.bucket.group_id())
        .collect()
}

/// Attaches group display names to each bucket.
#[must_use]
pub fn label_buckets(buckets: Vec<PermissionBucket>, groups: &[PermissionGroup]) -> Vec<GroupView> {
    let names: HashMap<PermissionGroupId, &str> = groups
        .iter()
        .map(|group| (group.id(), group.name()))
        .collect();

    buckets
        .into_iter()
        .map(|bucket| GroupView {
            group_name: bucket
                .bucket
                .group_id()
                .and_then(|group_id| names.get(&group_id))
                .map(|name| (*name).to_owned()),
            bucket: bucket.bucket,
            permissions: bucket.permissions,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use warden_core::{PermissionGroupId, PermissionId};

    use super::{GroupBucket, bucket_permissions, label_buckets, referenced_group_ids};
    use crate::{Permission, PermissionGroup, PermissionKey};

    fn permission(key: &str, group_id: Option<PermissionGroupId>) -> Permission {
        let Ok(key) = PermissionKey::new(key) else {
            panic!("test key should be valid");
        };
        Permission::new(PermissionId::new(), key, "", group_id)
    }

    #[test]
    fn buckets_follow_scan_order_not_alphabetical() {
        let zeta = PermissionGroupId::new();
        let alpha = PermissionGroupId::new();
        let permissions = vec![
            permission("zeta:one", Some(zeta)),
            permission("misc:one", None),
            permission("alpha:one", Some(alpha)),
            permission("zeta:two", Some(zeta)),
        ];

        let buckets = bucket_permissions(&permissions, &HashSet::new());

        let order: Vec<GroupBucket> = buckets.iter().map(|bucket| bucket.bucket).collect();
        assert_eq!(
            order,
            vec![
                GroupBucket::Group(zeta),
                GroupBucket::Ungrouped,
                GroupBucket::Group(alpha)
            ]
        );
        let zeta_keys: Vec<&str> = buckets[0]
            .permissions
            .iter()
            .map(|permission| permission.key.as_str())
            .collect();
        assert_eq!(zeta_keys, vec!["zeta:one", "zeta:two"]);
        assert_eq!(referenced_group_ids(&buckets), vec![zeta, alpha]);
    }

    #[test]
    fn unresolvable_group_keeps_bucket_without_name() {
        let known = PermissionGroupId::new();
        let missing = PermissionGroupId::new();
        let permissions = vec![
            permission("a:one", Some(known)),
            permission("b:one", Some(missing)),
            permission("c:one", None),
        ];
        let Ok(group) = PermissionGroup::restore(known, "General", "", true, false) else {
            panic!("group should be valid");
        };

        let views = label_buckets(bucket_permissions(&permissions, &HashSet::new()), &[group]);

        assert_eq!(views.len(), 3);
        assert_eq!(views[0].group_name.as_deref(), Some("General"));
        assert_eq!(views[1].group_name, None);
        assert_eq!(views[1].bucket, GroupBucket::Group(missing));
        assert_eq!(views[2].group_name, None);
        assert_eq!(views[2].bucket.as_transport(), "ungrouped");
    }

    #[test]
    fn assigned_flag_reflects_role_permissions() {
        let permissions = vec![permission("a:one", None), permission("a:two", None)];
        let assigned = HashSet::from([permissions[1].id()]);

        let buckets = bucket_permissions(&permissions, &assigned);

        let flags: Vec<bool> = buckets[0]
            .permissions
            .iter()
            .map(|permission| permission.assigned)
            .collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn empty_catalog_yields_empty_view() {
        let views = label_buckets(bucket_permissions(&[], &HashSet::new()), &[]);
        assert!(views.is_empty());
    }

    proptest! {
        #[test]
        fn every_permission_lands_in_exactly_one_bucket(
            layout in proptest::collection::vec(0_usize..4, 0..24)
        ) {
            let groups: Vec<PermissionGroupId> = (0..3).map(|_| PermissionGroupId::new()).collect();
            let permissions: Vec<Permission> = layout
                .iter()
                .enumerate()
                .map(|(index, slot)| {
                    permission(format!("p:k{index}").as_str(), groups.get(*slot).copied())
                })
                .collect();

            let buckets = bucket_permissions(&permissions, &HashSet::new());

            let flattened: Vec<PermissionId> = buckets
                .iter()
                .flat_map(|bucket| bucket.permissions.iter().map(|entry| entry.permission_id))
                .collect();
            prop_assert_eq!(flattened.len(), permissions.len());
            let distinct: HashSet<PermissionId> = flattened.into_iter().collect();
            prop_assert_eq!(distinct.len(), permissions.len());
            prop_assert!(buckets
                .iter()
                .all(|bucket| bucket.permissions.iter().all(|entry| !entry.assigned)));
        }
    }
}
