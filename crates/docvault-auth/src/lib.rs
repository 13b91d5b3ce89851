//! # docvault-auth
//!
//! Authorization and credential handling for DocVault.
//!
//! ## Modules
//!
//! - `rbac` — Role-based access control policies and enforcement
//! - `password` — Argon2id password hashing and policy enforcement

pub mod password;
pub mod rbac;

pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{RbacEnforcer, RbacPolicies, SystemPermission};
