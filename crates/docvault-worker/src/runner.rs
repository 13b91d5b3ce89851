//! Worker runner — main loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing::{error, info, trace, warn};

use docvault_core::config::worker::WorkerConfig;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::PgJobQueue;

/// Main worker runner that polls the queue and executes jobs.
#[derive(Debug)]
pub struct WorkerRunner {
    /// Job queue for polling.
    queue: Arc<PgJobQueue>,
    /// Job executor for dispatching.
    executor: Arc<JobExecutor>,
    /// Worker configuration.
    config: WorkerConfig,
    /// Worker identifier.
    worker_id: String,
}

impl WorkerRunner {
    /// Create a new worker runner.
    pub fn new(
        queue: Arc<PgJobQueue>,
        executor: Arc<JobExecutor>,
        config: WorkerConfig,
        worker_id: String,
    ) -> Self {
        Self {
            queue,
            executor,
            config,
            worker_id,
        }
    }

    /// Start the worker runner; runs until the cancel signal is received.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            worker_id = %self.worker_id,
            concurrency = self.config.concurrency,
            poll_interval = self.config.poll_interval_seconds,
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!(worker_id = %self.worker_id, "Worker received shutdown signal");
                        break;
                    }
                }
                _ = self.poll_and_execute(&semaphore) => {
                    tokio::select! {
                        _ = cancel.changed() => {
                            if *cancel.borrow() {
                                info!(worker_id = %self.worker_id, "Worker shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        info!(worker_id = %self.worker_id, "Waiting for in-flight jobs to complete");
        let max_permits = self.config.concurrency as u32;
        let _ =
            time::timeout(Duration::from_secs(30), semaphore.acquire_many(max_permits)).await;
        info!(worker_id = %self.worker_id, "Worker shut down complete");
    }

    /// Poll for a job and execute it if available.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) {
        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(p) => p,
            Err(_) => {
                trace!("All worker slots occupied");
                return;
            }
        };

        match self.queue.dequeue().await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);

                tokio::spawn(async move {
                    let _permit = permit;
                    let job_id = job.id;

                    match executor.execute(&job).await {
                        Ok(()) => {
                            if let Err(e) = queue.complete(job_id).await {
                                error!(%job_id, error = %e, "Failed to mark job as completed");
                            }
                        }
                        Err(JobExecutionError::Transient(msg)) => {
                            warn!(%job_id, error = %msg, "Job failed (transient)");
                            if let Err(e) = queue.fail(job_id, &msg).await {
                                error!(%job_id, error = %e, "Failed to record job failure");
                            }
                        }
                        Err(JobExecutionError::Permanent(msg)) => {
                            error!(%job_id, error = %msg, "Job failed permanently");
                            if let Err(e) = queue.fail_permanently(job_id, &msg).await {
                                error!(%job_id, error = %e, "Failed to record job failure");
                            }
                        }
                        Err(JobExecutionError::Internal(err)) => {
                            let msg = err.to_string();
                            error!(%job_id, error = %msg, "Job internal error");
                            if let Err(e) = queue.fail(job_id, &msg).await {
                                error!(%job_id, error = %e, "Failed to record job failure");
                            }
                        }
                    }
                });
            }
            Ok(None) => {
                drop(permit);
                trace!("No jobs available");
            }
            Err(e) => {
                drop(permit);
                error!(error = %e, "Failed to dequeue job");
            }
        }
    }
}
