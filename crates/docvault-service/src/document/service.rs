//! Document mutation operations: create, update, delete.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use docvault_auth::{RbacEnforcer, SystemPermission};
use docvault_cache::{keys, CacheManager};
use docvault_core::config::AppConfig;
use docvault_core::events::{DocumentEvent, DocumentSummary};
use docvault_core::traits::cache::CacheProvider;
use docvault_core::traits::notify::ChangePublisher;
use docvault_core::traits::queue::JobDispatcher;
use docvault_core::traits::storage::StorageProvider;
use docvault_core::{AppError, AppResult};
use docvault_entity::audit::{AuditAction, AuditStore, CreateAuditLogEntry};
use docvault_entity::document::{CreateDocument, Document, DocumentStore};
use docvault_entity::job::POST_PROCESS_JOB;

use crate::context::RequestContext;

/// Maximum accepted title length in characters.
const MAX_TITLE_LENGTH: usize = 255;

/// How many times a post-processing dispatch is retried before giving up.
const DISPATCH_ATTEMPTS: u32 = 3;

/// Input for creating a new document.
#[derive(Debug, Clone)]
pub struct CreateDocumentRequest {
    /// Document title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Original file name of the uploaded payload.
    pub file_name: String,
    /// MIME type as supplied by the uploader.
    pub content_type: String,
    /// The payload bytes.
    pub data: Bytes,
}

/// A replacement payload supplied as part of an update.
#[derive(Debug, Clone)]
pub struct ReplacePayload {
    /// Original file name of the new payload.
    pub file_name: String,
    /// MIME type of the new payload.
    pub content_type: String,
    /// The new payload bytes.
    pub data: Bytes,
}

/// Input for updating an existing document.
///
/// Every field is optional; absent fields are left untouched. An update
/// where nothing effectively changes is a no-op that writes neither an
/// audit entry nor `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentRequest {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// Replacement payload, if the file itself is being replaced.
    pub payload: Option<ReplacePayload>,
}

/// Orchestrates document CRUD, download, and cached listing.
///
/// Mutations follow a fixed ordering: access control, validation, the
/// storage write, then one database transaction pairing the row change
/// with its audit entry. Change publication, cache invalidation, and job
/// dispatch run after commit and are best-effort.
#[derive(Debug)]
pub struct DocumentService {
    pub(crate) documents: Arc<dyn DocumentStore>,
    pub(crate) audit: Arc<dyn AuditStore>,
    pub(crate) storage: Arc<dyn StorageProvider>,
    pub(crate) cache: CacheManager,
    pub(crate) rbac: Arc<RbacEnforcer>,
    pub(crate) jobs: Arc<dyn JobDispatcher>,
    pub(crate) publisher: Arc<dyn ChangePublisher>,
    pub(crate) max_upload_size_bytes: u64,
    pub(crate) cache_ttl: Duration,
    pub(crate) cache_timeout: Duration,
}

impl DocumentService {
    /// Create a new document service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        audit: Arc<dyn AuditStore>,
        storage: Arc<dyn StorageProvider>,
        cache: CacheManager,
        rbac: Arc<RbacEnforcer>,
        jobs: Arc<dyn JobDispatcher>,
        publisher: Arc<dyn ChangePublisher>,
        config: &AppConfig,
    ) -> Self {
        Self {
            documents,
            audit,
            storage,
            cache,
            rbac,
            jobs,
            publisher,
            max_upload_size_bytes: config.storage.max_upload_size_bytes,
            cache_ttl: Duration::from_secs(config.cache.default_ttl_seconds),
            cache_timeout: Duration::from_millis(config.cache.operation_timeout_ms),
        }
    }

    /// Create a document from an uploaded payload.
    ///
    /// The payload is written to storage first; the document row and its
    /// Create audit entry are then inserted in one transaction, so an
    /// audited document always exists and vice versa.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateDocumentRequest,
    ) -> AppResult<Document> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DocumentCreate)?;

        validate_title(&request.title)?;
        validate_file_name(&request.file_name)?;
        self.validate_payload_size(request.data.len())?;

        let storage_path = payload_path(ctx.user_id, &request.file_name);
        let file_size = request.data.len() as i64;
        self.storage.write(&storage_path, request.data).await?;

        let entry = CreateAuditLogEntry {
            user_id: Some(ctx.user_id),
            document_id: None,
            action: AuditAction::Create,
            document_title: request.title.clone(),
            ip_address: ctx.ip_address.clone(),
            details: format!(
                "Uploaded file: {} ({} bytes)",
                request.file_name, file_size
            ),
        };

        let create = CreateDocument {
            title: request.title,
            description: request.description,
            storage_path: storage_path.clone(),
            file_name: request.file_name,
            file_size,
            content_type: request.content_type,
            uploaded_by: ctx.user_id,
        };

        let document = match self.documents.create(&create, &entry).await {
            Ok(document) => document,
            Err(e) => {
                // The payload is already on disk; remove it so the failed
                // create leaves nothing behind.
                if let Err(cleanup) = self.storage.delete(&storage_path).await {
                    warn!(
                        path = %storage_path,
                        error = %cleanup,
                        "Failed to remove payload after aborted create"
                    );
                }
                return Err(e);
            }
        };

        info!(
            document_id = %document.id,
            user = %ctx.username,
            size_bytes = file_size,
            "Document created"
        );

        self.publish_change(DocumentEvent::Created {
            document: summarize(&document),
            user: ctx.username.clone(),
            timestamp: Utc::now(),
        })
        .await;
        self.dispatch_post_process(document.id).await;
        self.invalidate_lists().await;

        Ok(document)
    }

    /// Update a document's metadata and/or replace its payload.
    ///
    /// Accumulates a change description per modified field; when nothing
    /// changed the stored document is returned untouched.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        request: UpdateDocumentRequest,
    ) -> AppResult<Document> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DocumentUpdate)?;

        let mut document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;

        let mut changes: Vec<String> = Vec::new();

        if let Some(title) = request.title {
            validate_title(&title)?;
            if title != document.title {
                changes.push(format!("title: '{}' -> '{}'", document.title, title));
                document.title = title;
            }
        }

        if let Some(description) = request.description {
            if description != document.description {
                changes.push("description updated".to_string());
                document.description = description;
            }
        }

        let mut payload_replaced = false;
        if let Some(payload) = request.payload {
            validate_file_name(&payload.file_name)?;
            self.validate_payload_size(payload.data.len())?;

            // The old object goes first; if its removal fails the orphan
            // sweep picks it up later.
            if let Err(e) = self.storage.delete(&document.storage_path).await {
                warn!(
                    path = %document.storage_path,
                    error = %e,
                    "Failed to delete replaced payload, leaving it to the orphan sweep"
                );
            }

            let storage_path = payload_path(document.uploaded_by, &payload.file_name);
            self.storage.write(&storage_path, payload.data.clone()).await?;
            document.storage_path = storage_path;

            changes.push(format!(
                "file replaced: {} -> {}",
                document.file_name, payload.file_name
            ));
            document.file_name = payload.file_name;
            document.file_size = payload.data.len() as i64;
            document.content_type = payload.content_type;
            payload_replaced = true;
        }

        if changes.is_empty() {
            return Ok(document);
        }

        document.updated_at = Utc::now();

        let entry = CreateAuditLogEntry {
            user_id: Some(ctx.user_id),
            document_id: Some(document.id),
            action: AuditAction::Update,
            document_title: document.title.clone(),
            ip_address: ctx.ip_address.clone(),
            details: changes.join("; "),
        };

        let updated = self.documents.update(&document, &entry).await?;

        info!(
            document_id = %updated.id,
            user = %ctx.username,
            changes = changes.len(),
            "Document updated"
        );

        self.publish_change(DocumentEvent::Updated {
            document: summarize(&updated),
            user: ctx.username.clone(),
            timestamp: Utc::now(),
        })
        .await;
        self.invalidate_document(updated.id).await;
        self.invalidate_lists().await;
        if payload_replaced {
            self.dispatch_post_process(updated.id).await;
        }

        Ok(updated)
    }

    /// Delete a document and its stored payload.
    ///
    /// The audit entry carries no document reference but freezes the
    /// title and file name in its details, so the trail survives the row.
    /// The storage delete runs after commit; a failure there is logged
    /// and left to the orphan sweep.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DocumentDelete)?;

        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;

        let entry = CreateAuditLogEntry {
            user_id: Some(ctx.user_id),
            document_id: None,
            action: AuditAction::Delete,
            document_title: document.title.clone(),
            ip_address: ctx.ip_address.clone(),
            details: format!(
                "Deleted document: {} ({})",
                document.title, document.file_name
            ),
        };

        let removed = self.documents.delete(id, &entry).await?;
        if !removed {
            return Err(AppError::not_found(format!("Document {id} not found")));
        }

        info!(document_id = %id, user = %ctx.username, "Document deleted");

        if let Err(e) = self.storage.delete(&document.storage_path).await {
            warn!(
                path = %document.storage_path,
                error = %e,
                "Failed to delete payload, leaving it to the orphan sweep"
            );
        }

        self.invalidate_document(id).await;
        self.invalidate_lists().await;

        Ok(())
    }

    fn validate_payload_size(&self, size: usize) -> AppResult<()> {
        if size as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }
        if size == 0 {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        Ok(())
    }

    /// Publish a change event, logging instead of failing on error.
    pub(crate) async fn publish_change(&self, event: DocumentEvent) {
        if let Err(e) = self.publisher.publish(event).await {
            warn!(error = %e, "Failed to publish change notification");
        }
    }

    /// Enqueue post-processing for a document, retrying the dispatch a
    /// bounded number of times before giving up with a warning.
    pub(crate) async fn dispatch_post_process(&self, document_id: Uuid) {
        let payload = serde_json::json!({ "document_id": document_id });
        for attempt in 1..=DISPATCH_ATTEMPTS {
            match self.jobs.enqueue(POST_PROCESS_JOB, payload.clone()).await {
                Ok(()) => return,
                Err(e) if attempt < DISPATCH_ATTEMPTS => {
                    warn!(
                        %document_id,
                        attempt,
                        error = %e,
                        "Post-processing dispatch failed, retrying"
                    );
                }
                Err(e) => {
                    warn!(
                        %document_id,
                        error = %e,
                        "Giving up on post-processing dispatch"
                    );
                }
            }
        }
    }

    /// Drop the cached detail entry for a document.
    pub(crate) async fn invalidate_document(&self, id: Uuid) {
        let key = keys::document_detail(id);
        if let Err(e) = self.cache.delete(&key).await {
            warn!(%key, error = %e, "Failed to invalidate cached document");
        }
    }

    /// Drop every cached list. Falls back to flushing the whole cache
    /// when the backend cannot delete by pattern, so no stale list can
    /// outlive a mutation.
    pub(crate) async fn invalidate_lists(&self) {
        match self.cache.delete_pattern(&keys::document_list_pattern()).await {
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Pattern invalidation failed, flushing cache");
                if let Err(e) = self.cache.flush_all().await {
                    warn!(error = %e, "Cache flush failed");
                }
            }
        }
    }
}

/// Build the wire projection of a document for change events.
pub(crate) fn summarize(document: &Document) -> DocumentSummary {
    DocumentSummary {
        id: document.id,
        title: document.title.clone(),
        file_name: document.file_name.clone(),
    }
}

/// Derive the storage path for a new payload.
///
/// Paths are keyed by a fresh UUID rather than the row id, so replacing
/// a payload never overwrites the object a concurrent download may still
/// be streaming.
fn payload_path(owner: Uuid, file_name: &str) -> String {
    let object_id = Uuid::new_v4();
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("documents/{owner}/{object_id}.{}", ext.to_lowercase()),
        None => format!("documents/{owner}/{object_id}"),
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Title must not be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_file_name(file_name: &str) -> AppResult<()> {
    if file_name.trim().is_empty() {
        return Err(AppError::validation("File name must not be empty"));
    }
    Ok(())
}
