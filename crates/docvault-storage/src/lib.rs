//! # docvault-storage
//!
//! Storage provider implementations for DocVault document payloads.
//! Supports the local filesystem and an in-memory store for tests.
//!
//! Payloads are addressed by the opaque `storage_path` handle stored on
//! the document row; the metadata layer never touches provider paths
//! directly.

pub mod manager;
pub mod providers;

pub use manager::StorageManager;
