//! Broadcast-based change publisher.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use docvault_core::config::realtime::RealtimeConfig;
use docvault_core::events::DocumentEvent;
use docvault_core::result::AppResult;
use docvault_core::traits::notify::ChangePublisher;

use crate::message::ChangeMessage;

/// Fan-out publisher for document change notifications.
///
/// Wraps a tokio broadcast channel. Every subscriber receives every
/// message published after it subscribed; lagging subscribers lose the
/// oldest messages once the buffer fills.
#[derive(Debug, Clone)]
pub struct ChangeBroadcaster {
    /// The broadcast sender. Receivers are created on demand.
    tx: broadcast::Sender<ChangeMessage>,
}

impl ChangeBroadcaster {
    /// Create a new broadcaster from configuration.
    pub fn new(config: &RealtimeConfig) -> Self {
        let (tx, _) = broadcast::channel(config.buffer_size);
        Self { tx }
    }

    /// Subscribe to all future change messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeMessage> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeBroadcaster {
    fn default() -> Self {
        Self::new(&RealtimeConfig::default())
    }
}

#[async_trait]
impl ChangePublisher for ChangeBroadcaster {
    async fn publish(&self, event: DocumentEvent) -> AppResult<()> {
        let message = ChangeMessage::new(event);

        // send only fails when no subscriber exists, which is not an
        // error for fire-and-forget notifications.
        match self.tx.send(message) {
            Ok(receivers) => {
                debug!(receivers, "Published change notification");
            }
            Err(_) => {
                debug!("No subscribers for change notification");
            }
        }
        Ok(())
    }
}
