//! Document-related domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal projection of a document carried inside change events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// The document ID.
    pub id: Uuid,
    /// The document title.
    pub title: String,
    /// The original file name of the payload.
    pub file_name: String,
}

/// Events related to document mutations.
///
/// Only state changes visible to other clients are published; reads and
/// downloads are recorded in the audit log instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum DocumentEvent {
    /// A document was created.
    Created {
        /// The affected document.
        document: DocumentSummary,
        /// Username of the acting user.
        user: String,
        /// When the change happened.
        timestamp: DateTime<Utc>,
    },
    /// A document was updated (metadata or payload).
    Updated {
        /// The affected document.
        document: DocumentSummary,
        /// Username of the acting user.
        user: String,
        /// When the change happened.
        timestamp: DateTime<Utc>,
    },
}

impl DocumentEvent {
    /// The action name carried on the wire ("created" / "updated").
    pub fn action(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
        }
    }

    /// The affected document summary.
    pub fn document(&self) -> &DocumentSummary {
        match self {
            Self::Created { document, .. } | Self::Updated { document, .. } => document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = DocumentEvent::Created {
            document: DocumentSummary {
                id: Uuid::nil(),
                title: "Report".to_string(),
                file_name: "report.pdf".to_string(),
            },
            user: "alice".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "created");
        assert_eq!(json["document"]["title"], "Report");
        assert_eq!(json["user"], "alice");
    }
}
