//! Background job processing and scheduled tasks for DocVault.
//!
//! This crate provides:
//! - A Postgres-backed job queue implementing the dispatch capability
//! - A worker runner that polls for and executes queued jobs
//! - A cron scheduler for the periodic orphaned-payload sweep
//! - Built-in job handlers for document post-processing and cleanup

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::PgJobQueue;
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
