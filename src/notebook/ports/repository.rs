//! Repository port for durable notebook storage.

use crate::notebook::domain::{NotebookSnapshot, SettingsRecord, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notebook repository operations.
pub type NotebookRepositoryResult<T> = Result<T, NotebookRepositoryError>;

/// Durable notebook storage contract.
///
/// Implementations are written to by the persistence worker only; the
/// engine never awaits them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotebookRepository: Send + Sync {
    /// Writes `tasks` as a single batch.
    ///
    /// Each task is last-write-wins on `updated_at`: a stored record with a
    /// strictly newer timestamp is kept.
    async fn upsert_tasks(&self, tasks: &[Task]) -> NotebookRepositoryResult<()>;

    /// Removes a task. Removing an absent task succeeds.
    async fn delete_task(&self, id: &TaskId) -> NotebookRepositoryResult<()>;

    /// Replaces the stored settings and page layout.
    async fn save_settings(&self, record: &SettingsRecord) -> NotebookRepositoryResult<()>;

    /// Replaces everything stored with `snapshot`.
    async fn replace(&self, snapshot: &NotebookSnapshot) -> NotebookRepositoryResult<()>;

    /// Loads the stored notebook, or `None` when nothing was saved yet.
    async fn load(&self) -> NotebookRepositoryResult<Option<NotebookSnapshot>>;

    /// Removes everything stored.
    async fn clear(&self) -> NotebookRepositoryResult<()>;
}

/// Errors returned by notebook repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotebookRepositoryError {
    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotebookRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a serialization error.
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization(err.to_string())
    }
}
