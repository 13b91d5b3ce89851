//! Audit log repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_entity::audit::model::{AuditLogEntry, CreateAuditLogEntry};
use docvault_entity::audit::store::AuditStore;

/// Repository for audit log entries. Append-only by construction: no
/// update or delete statements exist in this module.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert an audit entry on an existing connection.
///
/// Used by the document repository to place the entry inside the same
/// transaction as the mutation it describes.
pub(crate) async fn insert_entry(
    conn: &mut PgConnection,
    entry: &CreateAuditLogEntry,
) -> AppResult<AuditLogEntry> {
    sqlx::query_as::<_, AuditLogEntry>(
        "INSERT INTO audit_log (user_id, document_id, action, document_title, ip_address, details) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(entry.user_id)
    .bind(entry.document_id)
    .bind(entry.action)
    .bind(&entry.document_title)
    .bind(&entry.ip_address)
    .bind(&entry.details)
    .fetch_one(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e))
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        insert_entry(&mut conn, entry).await
    }

    async fn list(
        &self,
        document_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let (total, entries) = match document_id {
            Some(doc_id) => {
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM audit_log WHERE document_id = $1")
                        .bind(doc_id)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to count audit entries",
                                e,
                            )
                        })?;

                let entries = sqlx::query_as::<_, AuditLogEntry>(
                    "SELECT * FROM audit_log WHERE document_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(doc_id)
                .bind(page.limit as i64)
                .bind(page.offset as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e)
                })?;

                (total, entries)
            }
            None => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Database,
                            "Failed to count audit entries",
                            e,
                        )
                    })?;

                let entries = sqlx::query_as::<_, AuditLogEntry>(
                    "SELECT * FROM audit_log ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                )
                .bind(page.limit as i64)
                .bind(page.offset as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e)
                })?;

                (total, entries)
            }
        };

        Ok(PageResponse::new(entries, total as u64, page))
    }
}
