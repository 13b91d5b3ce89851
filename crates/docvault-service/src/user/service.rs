//! User account service: registration, authentication, and admin
//! management operations.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use docvault_auth::{PasswordHasher, PasswordValidator, RbacEnforcer, SystemPermission};
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::{AppError, AppResult};
use docvault_entity::user::{CreateUser, User, UserRole, UserStore};

use crate::context::RequestContext;

/// Maximum accepted username length in characters.
const MAX_USERNAME_LENGTH: usize = 150;

/// User account operations.
///
/// Self-registration always produces a viewer; any other role must be
/// granted afterwards by an admin. Authentication failures are reported
/// with a single non-revealing message regardless of the cause.
#[derive(Debug)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    rbac: Arc<RbacEnforcer>,
}

impl UserService {
    /// Create a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            rbac,
        }
    }

    /// Self-register a new account. The new user is always a viewer.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        self.create_account(username, password, UserRole::Viewer)
            .await
    }

    /// Verify a username/password pair.
    ///
    /// Unknown username, wrong password, and deactivated account all
    /// yield the same `Authentication` error so a caller cannot probe
    /// which usernames exist.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let denied = || AppError::authentication("Invalid username or password");

        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!(username, "Authentication failed: unknown username");
                return Err(denied());
            }
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(username, "Authentication failed: wrong password");
            return Err(denied());
        }

        if !user.is_active {
            warn!(username, "Authentication failed: account deactivated");
            return Err(denied());
        }

        Ok(user)
    }

    /// Create an account with an explicit role. Admin only.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserCreate)?;
        self.create_account(username, password, role).await
    }

    /// List user accounts, newest first. Admin only.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserList)?;
        self.users.list(page).await
    }

    /// Change a user's role. Admin only.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        role: UserRole,
    ) -> AppResult<User> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserChangeRole)?;

        let user = self
            .users
            .update_role(user_id, role)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        info!(%user_id, role = %role, changed_by = %ctx.username, "User role changed");
        Ok(user)
    }

    /// Deactivate an account. Admin only.
    ///
    /// Accounts are never hard-deleted; their documents and audit trail
    /// stay attributed to them.
    pub async fn deactivate_user(&self, ctx: &RequestContext, user_id: Uuid) -> AppResult<User> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::UserDeactivate)?;

        let user = self
            .users
            .set_active(user_id, false)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        info!(%user_id, deactivated_by = %ctx.username, "User deactivated");
        Ok(user)
    }

    async fn create_account(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let username = validate_username(username)?;
        self.validator.validate(password)?;

        let password_hash = self.hasher.hash_password(password)?;
        let create = CreateUser {
            username: username.to_string(),
            password_hash,
            role,
        };

        let user = self.users.create(&create).await?;
        info!(user_id = %user.id, username, role = %role, "User created");
        Ok(user)
    }
}

fn validate_username(username: &str) -> AppResult<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AppError::validation(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | '+'))
    {
        return Err(AppError::validation(
            "Username may only contain letters, digits, and _ - . @ +",
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert_eq!(validate_username("  alice  ").unwrap(), "alice");
        assert!(validate_username("a.b-c_d@e+f").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
    }
}
