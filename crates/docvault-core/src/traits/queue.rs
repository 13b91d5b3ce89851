//! Job dispatch trait for the background processing queue.

use async_trait::async_trait;

use crate::result::AppResult;

/// Fire-and-forget job dispatch capability.
///
/// The core never awaits job completion; it only hands work to the queue.
/// Dispatch failures are the caller's to contain (logged, never fatal to
/// the surrounding operation).
#[async_trait]
pub trait JobDispatcher: Send + Sync + std::fmt::Debug + 'static {
    /// Enqueue a job of the given type with a JSON payload.
    async fn enqueue(&self, job_type: &str, payload: serde_json::Value) -> AppResult<()>;
}
