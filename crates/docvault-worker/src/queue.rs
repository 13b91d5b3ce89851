//! Postgres-backed job queue.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_core::traits::queue::JobDispatcher;
use docvault_database::repositories::JobRepository;
use docvault_entity::job::Job;

/// Default number of execution attempts for dispatched jobs.
const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// Job queue persisted in the `jobs` table.
///
/// Claiming uses `FOR UPDATE SKIP LOCKED`, so multiple worker processes
/// can poll the same table without double-claiming.
#[derive(Debug, Clone)]
pub struct PgJobQueue {
    /// Job repository for database persistence.
    repo: Arc<JobRepository>,
    /// Worker identifier for claiming jobs.
    worker_id: String,
}

impl PgJobQueue {
    /// Create a new job queue.
    pub fn new(repo: Arc<JobRepository>, worker_id: String) -> Self {
        Self { repo, worker_id }
    }

    /// Dequeue the next pending job, if any.
    pub async fn dequeue(&self) -> AppResult<Option<Job>> {
        let job = self.repo.claim_next(&self.worker_id).await?;
        if let Some(job) = &job {
            debug!(job_id = %job.id, job_type = %job.job_type, "Dequeued job");
        }
        Ok(job)
    }

    /// Mark a job as completed successfully.
    pub async fn complete(&self, job_id: Uuid) -> AppResult<()> {
        self.repo.mark_completed(job_id).await?;
        debug!(%job_id, "Job completed");
        Ok(())
    }

    /// Record a failed attempt; the job is retried while attempts remain.
    pub async fn fail(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.repo.mark_failed(job_id, error).await?;
        debug!(%job_id, error, "Job attempt failed");
        Ok(())
    }

    /// Mark a job as failed with no further retries.
    pub async fn fail_permanently(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.repo.mark_failed_permanently(job_id, error).await?;
        debug!(%job_id, error, "Job failed permanently");
        Ok(())
    }
}

#[async_trait]
impl JobDispatcher for PgJobQueue {
    async fn enqueue(&self, job_type: &str, payload: serde_json::Value) -> AppResult<()> {
        let job = self
            .repo
            .create(job_type, &payload, DEFAULT_MAX_ATTEMPTS)
            .await?;
        debug!(job_id = %job.id, job_type, "Enqueued job");
        Ok(())
    }
}
