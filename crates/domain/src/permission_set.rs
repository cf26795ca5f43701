use std::collections::BTreeSet;

use crate::PermissionKey;

/// Resolved set of permission keys held by a subject or carried by a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    keys: BTreeSet<String>,
}

impl PermissionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw keys. Duplicates collapse.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Pure membership test every gate reduces to.
    #[must_use]
    pub fn contains(&self, required: &str) -> bool {
        self.keys.contains(required)
    }

    /// Returns whether the set carries the super-admin key.
    #[must_use]
    pub fn has_super_admin(&self) -> bool {
        self.contains(PermissionKey::SUPER_ADMIN)
    }

    /// Returns whether the set carries the tenant-admin key.
    #[must_use]
    pub fn has_tenant_admin(&self) -> bool {
        self.contains(PermissionKey::TENANT_ADMIN)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates keys in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

/// Decides whether a role carrying `role_keys` may be listed to a caller holding `caller_keys`.
///
/// Super-admin roles are never listed. Tenant-admin roles are listed only to
/// callers holding the super-admin key.
#[must_use]
pub fn is_role_visible_to(role_keys: &PermissionSet, caller_keys: &PermissionSet) -> bool {
    if role_keys.has_super_admin() {
        return false;
    }

    if role_keys.has_tenant_admin() && !caller_keys.has_super_admin() {
        return false;
    }

    true
}
