//! # docvault-entity
//!
//! Entity models for DocVault (users, documents, audit log entries,
//! background jobs) together with the store traits the repositories
//! implement and the service layer consumes.

pub mod audit;
pub mod document;
pub mod job;
pub mod user;
