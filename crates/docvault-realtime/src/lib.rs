//! # docvault-realtime
//!
//! In-process change notification fan-out for DocVault. Document
//! mutations are published as [`ChangeMessage`]s on a tokio broadcast
//! channel; any number of consumers (websocket bridges, SSE feeds,
//! test probes) can subscribe.
//!
//! Publishing is fire-and-forget: a notification that reaches no
//! subscriber is dropped, never an error.

pub mod message;
pub mod publisher;

pub use message::ChangeMessage;
pub use publisher::ChangeBroadcaster;
