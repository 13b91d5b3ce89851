//! Built-in job handlers.

pub mod cleanup;
pub mod post_process;

pub use cleanup::CleanupJobHandler;
pub use post_process::PostProcessJobHandler;

pub use docvault_entity::job::{CLEANUP_ORPHANS_JOB, POST_PROCESS_JOB};
