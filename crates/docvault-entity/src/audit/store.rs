//! Audit store trait.

use async_trait::async_trait;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};

use super::model::{AuditLogEntry, CreateAuditLogEntry};

/// Persistence operations for the audit log.
///
/// Deliberately append-only: no update or delete methods exist, here or
/// on any implementation. Entries written as part of a document mutation
/// go through [`DocumentStore`](crate::document::DocumentStore) instead,
/// which pairs them transactionally with the mutation; this trait covers
/// the independent Read/Download inserts and queries.
#[async_trait]
pub trait AuditStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append a single entry.
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// List entries newest-first, optionally restricted to one document.
    async fn list(
        &self,
        document_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>>;
}
