//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docvault_entity::user::{User, UserRole};

/// Context for the current authenticated request.
///
/// Constructed after authentication and passed into every service
/// method, so each operation knows who is acting and from where. An
/// unauthenticated caller has no context and never reaches a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username (denormalized for audit details and notifications).
    pub username: String,
    /// The user's role at the time of authentication.
    pub role: UserRole,
    /// IP address of the request origin, when known.
    pub ip_address: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        username: String,
        role: UserRole,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            user_id,
            username,
            role,
            ip_address,
            request_time: Utc::now(),
        }
    }

    /// Creates a context for an authenticated user.
    pub fn for_user(user: &User, ip_address: Option<String>) -> Self {
        Self::new(user.id, user.username.clone(), user.role, ip_address)
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
