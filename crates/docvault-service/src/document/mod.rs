//! Document orchestration: CRUD, download, and cached listing.

pub mod query;
pub mod service;

pub use query::DocumentDownload;
pub use service::{
    CreateDocumentRequest, DocumentService, ReplacePayload, UpdateDocumentRequest,
};
