//! Domain events emitted by DocVault operations.
//!
//! Events are handed to the change publisher and fan out to connected
//! real-time subscribers.

pub mod document;

pub use document::{DocumentEvent, DocumentSummary};
