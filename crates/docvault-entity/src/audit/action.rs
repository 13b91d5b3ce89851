//! Audit action enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of action recorded by an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// A document was created.
    Create,
    /// A document's metadata was retrieved.
    Read,
    /// A document was updated.
    Update,
    /// A document was deleted.
    Delete,
    /// A document's payload was downloaded.
    Download,
}

impl AuditAction {
    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
