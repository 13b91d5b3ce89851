//! Background job repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::job::model::Job;

/// Repository for the background job queue.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new pending job.
    pub async fn create(
        &self,
        job_type: &str,
        payload: &serde_json::Value,
        max_attempts: i32,
    ) -> AppResult<Job> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (job_type, payload, max_attempts) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(job_type)
        .bind(payload)
        .bind(max_attempts)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to enqueue job", e))
    }

    /// Claim the next pending job for the given worker.
    ///
    /// Uses `FOR UPDATE SKIP LOCKED` so concurrent workers never claim
    /// the same job.
    pub async fn claim_next(&self, worker_id: &str) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'running', worker_id = $1, \
             attempts = attempts + 1, started_at = now(), updated_at = now() \
             WHERE id = ( \
                 SELECT id FROM jobs WHERE status = 'pending' \
                 ORDER BY created_at ASC \
                 FOR UPDATE SKIP LOCKED LIMIT 1 \
             ) RETURNING *",
        )
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim job", e))
    }

    /// Mark a job as successfully completed.
    pub async fn mark_completed(&self, job_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'completed', completed_at = now(), updated_at = now() \
             WHERE id = $1",
        )
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(())
    }

    /// Mark a job as failed with no further retries.
    pub async fn mark_failed_permanently(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, \
             completed_at = now(), updated_at = now() WHERE id = $1",
        )
        .bind(job_id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record job failure", e))?;
        Ok(())
    }

    /// Record a failed attempt. The job returns to `pending` while
    /// attempts remain, otherwise it is marked `failed`.
    pub async fn mark_failed(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET \
             status = CASE WHEN attempts >= max_attempts THEN 'failed'::job_status \
                           ELSE 'pending'::job_status END, \
             error_message = $2, \
             completed_at = CASE WHEN attempts >= max_attempts THEN now() ELSE NULL END, \
             updated_at = now() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record job failure", e))?;
        Ok(())
    }
}
