//! Message envelope for change notifications.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docvault_core::events::document::DocumentEvent;

/// Envelope wrapping a document event for delivery to subscribers.
///
/// Serializes to the flat notification payload: `id` plus the event's
/// own `action`, `document`, `user` and `timestamp` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeMessage {
    /// Unique message ID for deduplication on the consumer side.
    pub id: String,
    /// The document event being delivered.
    #[serde(flatten)]
    pub event: DocumentEvent,
}

impl ChangeMessage {
    /// Create a new envelope wrapping an event.
    pub fn new(event: DocumentEvent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event,
        }
    }
}
