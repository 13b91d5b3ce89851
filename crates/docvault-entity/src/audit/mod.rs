//! Audit log entities.

pub mod action;
pub mod model;
pub mod store;

pub use action::AuditAction;
pub use model::{AuditLogEntry, CreateAuditLogEntry};
pub use store::AuditStore;
