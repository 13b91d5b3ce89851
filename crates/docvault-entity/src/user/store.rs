//! User store trait.

use async_trait::async_trait;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};

use super::model::{CreateUser, User};
use super::role::UserRole;

/// Persistence operations for users.
///
/// Implemented by the PostgreSQL repository and by in-memory fakes in
/// tests. Users are never hard-deleted through this interface.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a new user. Returns a `Conflict` error when the username
    /// is already taken.
    async fn create(&self, user: &CreateUser) -> AppResult<User>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Change a user's role. Returns the updated user.
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>>;

    /// Set a user's active flag. Returns the updated user.
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>>;
}
