//! Document repository implementation.
//!
//! Every mutation runs in a transaction together with the audit entry
//! describing it, so the pair commits or rolls back as a unit.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::filter::DocumentFilter;
use docvault_entity::audit::model::CreateAuditLogEntry;
use docvault_entity::document::model::{CreateDocument, Document};
use docvault_entity::document::store::DocumentStore;

use super::audit::insert_entry;

/// Repository for document CRUD and query operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn tx_err(e: sqlx::Error, what: &str) -> AppError {
        AppError::with_source(ErrorKind::Database, format!("Failed to {what}"), e)
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn create(
        &self,
        doc: &CreateDocument,
        audit: &CreateAuditLogEntry,
    ) -> AppResult<Document> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::tx_err(e, "begin transaction"))?;

        let created = sqlx::query_as::<_, Document>(
            "INSERT INTO documents \
             (title, description, storage_path, file_name, file_size, content_type, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&doc.title)
        .bind(&doc.description)
        .bind(&doc.storage_path)
        .bind(&doc.file_name)
        .bind(doc.file_size)
        .bind(&doc.content_type)
        .bind(doc.uploaded_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::tx_err(e, "insert document"))?;

        // The audit entry is created against the fresh row id.
        let mut entry = audit.clone();
        entry.document_id = Some(created.id);
        insert_entry(&mut tx, &entry).await?;

        tx.commit()
            .await
            .map_err(|e| Self::tx_err(e, "commit document creation"))?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve documents", e)
            })?;

        // Re-impose the input ordering; ids deleted since are skipped.
        let mut by_id: HashMap<Uuid, Document> =
            rows.into_iter().map(|d| (d.id, d)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn list(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.title.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            conditions.push(format!("title ILIKE ${param_idx}"));
            param_idx += 1;
        }
        if filter
            .content_type
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
        {
            conditions.push(format!("content_type ILIKE ${param_idx}"));
            param_idx += 1;
        }
        if filter.uploaded_by.is_some() {
            conditions.push(format!("uploaded_by = ${param_idx}"));
            param_idx += 1;
        }
        if filter.created_after.is_some() {
            conditions.push(format!("created_at >= ${param_idx}"));
            param_idx += 1;
        }
        if filter.created_before.is_some() {
            conditions.push(format!("created_at <= ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql =
            format!("SELECT * FROM documents {where_clause} ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Document>(&sql);
        if let Some(title) = filter.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.bind(format!("%{title}%"));
        }
        if let Some(ct) = filter
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            query = query.bind(format!("%{ct}%"));
        }
        if let Some(uploaded_by) = filter.uploaded_by {
            query = query.bind(uploaded_by);
        }
        if let Some(after) = filter.created_after {
            query = query.bind(after);
        }
        if let Some(before) = filter.created_before {
            query = query.bind(before);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    async fn update(&self, doc: &Document, audit: &CreateAuditLogEntry) -> AppResult<Document> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::tx_err(e, "begin transaction"))?;

        let updated = sqlx::query_as::<_, Document>(
            "UPDATE documents SET title = $2, description = $3, storage_path = $4, \
             file_name = $5, file_size = $6, content_type = $7, updated_at = $8 \
             WHERE id = $1 RETURNING *",
        )
        .bind(doc.id)
        .bind(&doc.title)
        .bind(&doc.description)
        .bind(&doc.storage_path)
        .bind(&doc.file_name)
        .bind(doc.file_size)
        .bind(&doc.content_type)
        .bind(doc.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| Self::tx_err(e, "update document"))?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", doc.id)))?;

        insert_entry(&mut tx, audit).await?;

        tx.commit()
            .await
            .map_err(|e| Self::tx_err(e, "commit document update"))?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid, audit: &CreateAuditLogEntry) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::tx_err(e, "begin transaction"))?;

        // Audit first: the entry's document reference is already null and
        // its title frozen, so the row deletion below cannot disturb it.
        insert_entry(&mut tx, audit).await?;

        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::tx_err(e, "delete document"))?;

        tx.commit()
            .await
            .map_err(|e| Self::tx_err(e, "commit document deletion"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn storage_paths(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT storage_path FROM documents")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list storage paths", e)
            })
    }
}
