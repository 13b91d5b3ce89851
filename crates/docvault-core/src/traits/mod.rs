//! Capability traits consumed by the orchestration core.
//!
//! Each trait models one external collaborator (cache, payload storage,
//! job queue, change publisher). Implementations live in their own
//! crates; services receive them as injected `Arc<dyn ...>` handles.

pub mod cache;
pub mod notify;
pub mod queue;
pub mod storage;
