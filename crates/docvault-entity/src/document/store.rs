//! Document store trait.

use async_trait::async_trait;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_core::types::filter::DocumentFilter;

use crate::audit::model::CreateAuditLogEntry;

use super::model::{CreateDocument, Document};

/// Persistence operations for documents.
///
/// Every mutating method takes the audit entry describing it: the store
/// applies the mutation and the audit insert as one atomic transaction,
/// so a mutation can never be recorded without its audit record and vice
/// versa.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a document row together with its Create audit entry.
    async fn create(&self, doc: &CreateDocument, audit: &CreateAuditLogEntry)
        -> AppResult<Document>;

    /// Find a document by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// Resolve a list of IDs into documents, preserving the input order.
    /// IDs that no longer exist are silently skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Document>>;

    /// List all documents matching the filter, newest-created-first.
    async fn list(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>>;

    /// Persist an updated document row together with its Update audit entry.
    async fn update(&self, doc: &Document, audit: &CreateAuditLogEntry) -> AppResult<Document>;

    /// Delete a document row together with its Delete audit entry.
    /// Returns `false` when the row no longer exists.
    async fn delete(&self, id: Uuid, audit: &CreateAuditLogEntry) -> AppResult<bool>;

    /// All storage paths currently referenced by document rows.
    /// Used by the orphaned-payload cleanup job.
    async fn storage_paths(&self) -> AppResult<Vec<String>>;
}
