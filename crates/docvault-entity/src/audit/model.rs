//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::AuditAction;

/// An immutable audit log entry recording a document access or mutation.
///
/// Both references are weak: the acting user and the subject document may
/// be deleted later, in which case the fields null out while the entry
/// persists. `document_title` freezes the title at the time of the action
/// for exactly that reason.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action (nulled if the user is deleted).
    pub user_id: Option<Uuid>,
    /// The subject document (nulled on document deletion).
    pub document_id: Option<Uuid>,
    /// The action that was performed.
    pub action: AuditAction,
    /// The document's title at the time of the action.
    pub document_title: String,
    /// Originating client IP, when known.
    pub ip_address: Option<String>,
    /// Free-text details about the action.
    pub details: String,
    /// When the action occurred. Set once, never updated.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLogEntry {
    /// The acting user.
    pub user_id: Option<Uuid>,
    /// The subject document. Left empty for Delete entries, whose subject
    /// is about to vanish.
    pub document_id: Option<Uuid>,
    /// The action performed.
    pub action: AuditAction,
    /// Frozen copy of the document title.
    pub document_title: String,
    /// Originating client IP.
    pub ip_address: Option<String>,
    /// Free-text details.
    pub details: String,
}
