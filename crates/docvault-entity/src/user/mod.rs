//! User entity and RBAC role.

pub mod model;
pub mod role;
pub mod store;

pub use model::{CreateUser, User};
pub use role::UserRole;
pub use store::UserStore;
