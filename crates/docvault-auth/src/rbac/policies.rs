//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use docvault_entity::user::UserRole;

/// A system-level permission checked before every service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    // Document operations
    /// List documents.
    DocumentList,
    /// Read document metadata.
    DocumentRead,
    /// Download document payloads.
    DocumentDownload,
    /// Upload new documents.
    DocumentCreate,
    /// Update document metadata or replace payloads.
    DocumentUpdate,
    /// Delete documents.
    DocumentDelete,

    // User management
    /// List user accounts.
    UserList,
    /// Create user accounts with an explicit role.
    UserCreate,
    /// Change user roles.
    UserChangeRole,
    /// Deactivate user accounts.
    UserDeactivate,

    // Audit
    /// Read the audit log.
    AuditView,
}

/// Defines the mapping from each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Role → set of permissions.
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        // Viewer: read-only document access
        let viewer: HashSet<SystemPermission> = [
            SystemPermission::DocumentList,
            SystemPermission::DocumentRead,
            SystemPermission::DocumentDownload,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Viewer, viewer);

        // Editor: viewer + upload and update
        let editor: HashSet<SystemPermission> = [
            SystemPermission::DocumentList,
            SystemPermission::DocumentRead,
            SystemPermission::DocumentDownload,
            SystemPermission::DocumentCreate,
            SystemPermission::DocumentUpdate,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Editor, editor);

        // Admin: everything
        let admin: HashSet<SystemPermission> = [
            SystemPermission::DocumentList,
            SystemPermission::DocumentRead,
            SystemPermission::DocumentDownload,
            SystemPermission::DocumentCreate,
            SystemPermission::DocumentUpdate,
            SystemPermission::DocumentDelete,
            SystemPermission::UserList,
            SystemPermission::UserCreate,
            SystemPermission::UserChangeRole,
            SystemPermission::UserDeactivate,
            SystemPermission::AuditView,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Admin, admin);

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: &UserRole) -> HashSet<SystemPermission> {
        self.policies.get(role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies
            .get(role)
            .map(|perms| perms.contains(permission))
            .unwrap_or(false)
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
