//! Post-upload document processing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use docvault_entity::document::store::DocumentStore;
use docvault_entity::job::Job;

use crate::executor::{JobExecutionError, JobHandler};

use super::POST_PROCESS_JOB;

/// Payload of a post-processing job.
#[derive(Debug, Deserialize)]
struct PostProcessPayload {
    /// The document to process.
    document_id: Uuid,
}

/// Runs after a document upload or payload replacement.
///
/// Extension point for virus scanning, thumbnail generation, metadata
/// extraction and indexing. A document deleted before the job runs is
/// a warning, not a failure.
#[derive(Debug)]
pub struct PostProcessJobHandler {
    /// Document metadata store.
    documents: Arc<dyn DocumentStore>,
}

impl PostProcessJobHandler {
    /// Create a new post-processing handler.
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl JobHandler for PostProcessJobHandler {
    fn job_type(&self) -> &str {
        POST_PROCESS_JOB
    }

    async fn execute(&self, job: &Job) -> Result<(), JobExecutionError> {
        let payload: PostProcessPayload = serde_json::from_value(job.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("Invalid job payload: {e}")))?;

        let document = self
            .documents
            .find_by_id(payload.document_id)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Failed to load document: {e}")))?;

        let Some(document) = document else {
            warn!(document_id = %payload.document_id, "Document not found for processing");
            return Ok(());
        };

        info!(
            document_id = %document.id,
            file_name = %document.file_name,
            file_size = document.file_size,
            "Processing document"
        );

        info!(document_id = %document.id, "Document processing complete");
        Ok(())
    }
}
