//! Document read operations: get, download, and cached listing.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use docvault_auth::SystemPermission;
use docvault_cache::keys;
use docvault_core::traits::cache::CacheProvider;
use docvault_core::traits::storage::ByteStream;
use docvault_core::types::filter::DocumentFilter;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::{AppError, AppResult};
use docvault_entity::audit::{AuditAction, CreateAuditLogEntry};
use docvault_entity::document::Document;

use crate::context::RequestContext;
use crate::document::DocumentService;

/// A document payload ready for streaming to the client.
pub struct DocumentDownload {
    /// Original file name, for the Content-Disposition header.
    pub file_name: String,
    /// MIME type of the payload.
    pub content_type: String,
    /// Payload size in bytes.
    pub file_size: i64,
    /// The payload byte stream.
    pub stream: ByteStream,
}

impl std::fmt::Debug for DocumentDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentDownload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("file_size", &self.file_size)
            .finish_non_exhaustive()
    }
}

impl DocumentService {
    /// Retrieve a document by id.
    ///
    /// The detail lookup is cache-aside; the Read audit entry is written
    /// on every call, cache hit or not, and a failure to write it fails
    /// the whole operation.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Document> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DocumentRead)?;

        let document = self
            .load_document(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;

        self.record_access(ctx, &document, AuditAction::Read).await?;

        Ok(document)
    }

    /// Open a document payload for download.
    pub async fn download(&self, ctx: &RequestContext, id: Uuid) -> AppResult<DocumentDownload> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DocumentDownload)?;

        let document = self
            .load_document(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;

        self.record_access(ctx, &document, AuditAction::Download)
            .await?;

        let stream = self.storage.read(&document.storage_path).await?;

        Ok(DocumentDownload {
            file_name: document.file_name,
            content_type: document.content_type,
            file_size: document.file_size,
            stream,
        })
    }

    /// List documents matching a filter, paginated.
    ///
    /// The cache holds the full ordered id list per filter; pagination
    /// is applied after resolution, so every page of one filter shares a
    /// single cache entry and one invalidation covers them all. Ids whose
    /// rows have vanished since caching are silently skipped.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &DocumentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Document>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DocumentList)?;

        let key = keys::document_list(filter);

        let ids: Vec<Uuid> = match self.cache_get(&key).await {
            Some(ids) => ids,
            None => {
                let documents = self.documents.list(filter).await?;
                let ids: Vec<Uuid> = documents.iter().map(|d| d.id).collect();
                self.cache_put(&key, &ids).await;
                ids
            }
        };

        let total = ids.len() as u64;
        let start = (page.offset as usize).min(ids.len());
        let end = (start + page.limit as usize).min(ids.len());
        let page_ids = &ids[start..end];

        let items = if page_ids.is_empty() {
            Vec::new()
        } else {
            self.documents.find_by_ids(page_ids).await?
        };

        Ok(PageResponse::new(items, total, page))
    }

    /// Cache-aside lookup of a single document.
    async fn load_document(&self, id: Uuid) -> AppResult<Option<Document>> {
        let key = keys::document_detail(id);

        if let Some(document) = self.cache_get::<Document>(&key).await {
            return Ok(Some(document));
        }

        let document = self.documents.find_by_id(id).await?;
        if let Some(ref document) = document {
            self.cache_put(&key, document).await;
        }

        Ok(document)
    }

    /// Append a Read or Download audit entry for an access.
    async fn record_access(
        &self,
        ctx: &RequestContext,
        document: &Document,
        action: AuditAction,
    ) -> AppResult<()> {
        let entry = CreateAuditLogEntry {
            user_id: Some(ctx.user_id),
            document_id: Some(document.id),
            action,
            document_title: document.title.clone(),
            ip_address: ctx.ip_address.clone(),
            details: String::new(),
        };
        self.audit.append(&entry).await?;
        Ok(())
    }

    /// Read a cached value, treating errors and timeouts as misses.
    async fn cache_get<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match tokio::time::timeout(self.cache_timeout, self.cache.get_json::<T>(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!(%key, error = %e, "Cache read failed, treating as miss");
                None
            }
            Err(_) => {
                warn!(%key, "Cache read timed out, treating as miss");
                None
            }
        }
    }

    /// Write a cached value, discarding errors and timeouts.
    async fn cache_put<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        match tokio::time::timeout(
            self.cache_timeout,
            self.cache.set_json(key, value, self.cache_ttl),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(%key, error = %e, "Cache write failed"),
            Err(_) => warn!(%key, "Cache write timed out"),
        }
    }
}
