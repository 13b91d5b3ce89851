//! Audit log querying.

pub mod service;

pub use service::AuditService;
