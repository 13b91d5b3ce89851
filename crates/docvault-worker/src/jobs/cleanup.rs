//! Orphaned payload cleanup.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use docvault_core::traits::storage::StorageProvider;
use docvault_entity::document::store::DocumentStore;
use docvault_entity::job::Job;

use crate::executor::{JobExecutionError, JobHandler};

use super::CLEANUP_ORPHANS_JOB;

/// Prefix under which all document payloads live.
const PAYLOAD_PREFIX: &str = "documents/";

/// Removes stored payloads no longer referenced by any document row.
///
/// Physical deletes after a metadata delete are best-effort, so stray
/// objects can accumulate; this periodic sweep is the backstop.
#[derive(Debug)]
pub struct CleanupJobHandler {
    /// Document metadata store.
    documents: Arc<dyn DocumentStore>,
    /// Payload storage.
    storage: Arc<dyn StorageProvider>,
}

impl CleanupJobHandler {
    /// Create a new cleanup handler.
    pub fn new(documents: Arc<dyn DocumentStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { documents, storage }
    }
}

#[async_trait]
impl JobHandler for CleanupJobHandler {
    fn job_type(&self) -> &str {
        CLEANUP_ORPHANS_JOB
    }

    async fn execute(&self, _job: &Job) -> Result<(), JobExecutionError> {
        info!("Running orphaned payload cleanup");

        let referenced: HashSet<String> = self
            .documents
            .storage_paths()
            .await
            .map_err(|e| {
                JobExecutionError::Transient(format!("Failed to load referenced paths: {e}"))
            })?
            .into_iter()
            .collect();

        let stored = self.storage.list(PAYLOAD_PREFIX).await.map_err(|e| {
            JobExecutionError::Transient(format!("Failed to list stored payloads: {e}"))
        })?;

        let mut removed = 0u64;
        for object in stored {
            if referenced.contains(&object.path) {
                continue;
            }
            match self.storage.delete(&object.path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %object.path, error = %e, "Failed to delete orphaned payload");
                }
            }
        }

        info!(removed, "Orphaned payload cleanup complete");
        Ok(())
    }
}
