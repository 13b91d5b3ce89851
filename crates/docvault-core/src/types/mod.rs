//! Shared request/response types.

pub mod filter;
pub mod pagination;
