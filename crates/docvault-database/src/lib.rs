//! # docvault-database
//!
//! PostgreSQL connection management, migrations, and repository
//! implementations of the entity store traits. Mutating document
//! operations pair the row change with its audit entry inside one
//! transaction.

pub mod connection;
pub mod migration;
pub mod repositories;
