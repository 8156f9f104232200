//! Data types shared across the pipeline.

pub mod repository;

pub use repository::{RepositoryCollection, RepositoryRecord};
