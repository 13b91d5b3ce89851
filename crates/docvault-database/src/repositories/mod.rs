//! Repository implementations of the entity store traits.

pub mod audit;
pub mod document;
pub mod job;
pub mod user;

pub use audit::AuditLogRepository;
pub use document::DocumentRepository;
pub use job::JobRepository;
pub use user::UserRepository;
