//! Change notification trait for real-time publishing.

use async_trait::async_trait;

use crate::events::DocumentEvent;
use crate::result::AppResult;

/// Fire-and-forget publish capability for document change events.
///
/// Publishing is best-effort: the caller discards the error variant with
/// a logged warning and the surrounding operation proceeds regardless.
#[async_trait]
pub trait ChangePublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish a document change event to all connected subscribers.
    async fn publish(&self, event: DocumentEvent) -> AppResult<()>;
}
