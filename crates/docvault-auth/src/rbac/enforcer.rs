//! RBAC enforcement logic.

use docvault_core::error::AppError;
use docvault_entity::user::UserRole;

use super::policies::{RbacPolicies, SystemPermission};

/// Enforces role-based access control for service operations.
///
/// Denials carry only the role and permission names, never any
/// information about the resource the caller asked for.
#[derive(Debug, Clone)]
pub struct RbacEnforcer {
    /// The policy configuration.
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Checks whether the given role has the required permission.
    ///
    /// Returns `Ok(())` if allowed, or an `Authorization` error if denied.
    pub fn require_permission(
        &self,
        role: &UserRole,
        permission: &SystemPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }

    /// Checks whether the role has the required permission (returns bool).
    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Returns whether the role is an admin.
    pub fn is_admin(&self, role: &UserRole) -> bool {
        role.is_admin()
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}

impl Default for RbacEnforcer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;

    #[test]
    fn test_allowed_permission_passes() {
        let enforcer = RbacEnforcer::new();
        assert!(
            enforcer
                .require_permission(&UserRole::Viewer, &SystemPermission::DocumentList)
                .is_ok()
        );
    }

    #[test]
    fn test_denied_permission_is_authorization_error() {
        let enforcer = RbacEnforcer::new();
        let err = enforcer
            .require_permission(&UserRole::Viewer, &SystemPermission::DocumentDelete)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_denial_message_names_no_resource() {
        let enforcer = RbacEnforcer::new();
        let err = enforcer
            .require_permission(&UserRole::Editor, &SystemPermission::AuditView)
            .unwrap_err();
        assert!(err.message.contains("editor"));
        assert!(err.message.contains("AuditView"));
    }
}
