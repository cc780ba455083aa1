//! Port contracts for notebook persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by notebook
//! services.

pub mod repository;

pub use repository::{NotebookRepository, NotebookRepositoryError, NotebookRepositoryResult};
