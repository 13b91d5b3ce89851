//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, error, info};

use docvault_core::config::worker::WorkerConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::queue::JobDispatcher;

use crate::jobs::CLEANUP_ORPHANS_JOB;
use crate::queue::PgJobQueue;

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work.
    queue: Arc<PgJobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(queue: Arc<PgJobQueue>) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, queue })
    }

    /// Register all scheduled tasks from configuration.
    pub async fn register_tasks(&self, config: &WorkerConfig) -> AppResult<()> {
        self.register_orphan_cleanup(&config.cleanup_schedule)
            .await?;
        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;
        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;
        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Orphaned payload sweep, hourly by default.
    async fn register_orphan_cleanup(&self, schedule: &str) -> AppResult<()> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                debug!("Scheduling orphaned payload cleanup job");
                if let Err(e) = queue
                    .enqueue(CLEANUP_ORPHANS_JOB, serde_json::json!({}))
                    .await
                {
                    error!(error = %e, "Failed to enqueue orphan cleanup");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create cleanup schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add cleanup schedule: {e}")))?;

        info!(schedule, "Registered: orphaned payload cleanup");
        Ok(())
    }
}
