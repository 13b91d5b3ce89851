//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A document stored in DocVault.
///
/// `file_name`, `file_size`, and `content_type` always describe the
/// currently stored payload; they are replaced together whenever the
/// payload is replaced.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Document title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Opaque handle into the payload storage provider.
    pub storage_path: String,
    /// Original file name of the payload.
    pub file_name: String,
    /// Payload size in bytes.
    pub file_size: i64,
    /// MIME type as supplied by the uploader.
    pub content_type: String,
    /// The uploading user. Deleting the user cascades to their documents.
    pub uploaded_by: Uuid,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new document record.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    /// Document title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Opaque handle of the already stored payload.
    pub storage_path: String,
    /// Original file name of the payload.
    pub file_name: String,
    /// Payload size in bytes.
    pub file_size: i64,
    /// MIME type as supplied by the uploader.
    pub content_type: String,
    /// The uploading user.
    pub uploaded_by: Uuid,
}
