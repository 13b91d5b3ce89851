//! Document entity.

pub mod model;
pub mod store;

pub use model::{CreateDocument, Document};
pub use store::DocumentStore;
