//! Background job entities.

pub mod model;
pub mod status;

pub use model::Job;
pub use status::JobStatus;

/// Job type for post-upload document processing.
pub const POST_PROCESS_JOB: &str = "document.post_process";

/// Job type for the orphaned payload sweep.
pub const CLEANUP_ORPHANS_JOB: &str = "storage.cleanup_orphans";
