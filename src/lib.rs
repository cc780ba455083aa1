//! Autofocus: a paper-notebook task engine.
//!
//! Tasks are written onto bounded pages. The reader moves through pages one
//! at a time, and leaving a page without acting on it dismisses whatever is
//! still open there. Finished tasks stay in place as history and feed recall
//! suggestions.
//!
//! # Architecture
//!
//! Autofocus follows hexagonal architecture principles:
//!
//! - **Domain**: tasks, pages, settings, and the snapshot document, with no
//!   infrastructure dependencies
//! - **Ports**: the repository contract used for durable storage
//! - **Adapters**: in-memory and JSON-file repositories
//! - **Services**: the single-writer engine and the persistence worker
//!
//! # Modules
//!
//! - [`notebook`]: the notebook engine and its storage plumbing

pub mod notebook;
