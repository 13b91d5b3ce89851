//! # docvault-service
//!
//! Business logic service layer for DocVault. Each service orchestrates
//! stores, cache, payload storage, and access control to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all collaborators are provided
//! at construction time as `Arc` handles, so every service runs equally
//! against the PostgreSQL repositories or the in-memory fakes used in
//! tests.

pub mod audit;
pub mod context;
pub mod document;
pub mod user;

pub use audit::AuditService;
pub use context::RequestContext;
pub use document::{
    CreateDocumentRequest, DocumentDownload, DocumentService, ReplacePayload,
    UpdateDocumentRequest,
};
pub use user::UserService;
