//! In-memory notebook repository for tests and embedding.

use super::document::{apply_settings, delete_record, empty_snapshot, upsert_records};
use crate::notebook::{
    domain::{NotebookSnapshot, SettingsRecord, Task, TaskId},
    ports::{NotebookRepository, NotebookRepositoryError, NotebookRepositoryResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory notebook repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotebookRepository {
    state: Arc<RwLock<Option<NotebookSnapshot>>>,
}

impl InMemoryNotebookRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that already holds `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: NotebookSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    fn mutate(
        &self,
        apply: impl FnOnce(&mut NotebookSnapshot),
    ) -> NotebookRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            NotebookRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        apply(state.get_or_insert_with(empty_snapshot));
        Ok(())
    }
}

#[async_trait]
impl NotebookRepository for InMemoryNotebookRepository {
    async fn upsert_tasks(&self, tasks: &[Task]) -> NotebookRepositoryResult<()> {
        self.mutate(|snapshot| upsert_records(snapshot, tasks))
    }

    async fn delete_task(&self, id: &TaskId) -> NotebookRepositoryResult<()> {
        self.mutate(|snapshot| delete_record(snapshot, id))
    }

    async fn save_settings(&self, record: &SettingsRecord) -> NotebookRepositoryResult<()> {
        self.mutate(|snapshot| apply_settings(snapshot, record))
    }

    async fn replace(&self, snapshot: &NotebookSnapshot) -> NotebookRepositoryResult<()> {
        self.mutate(|stored| *stored = snapshot.clone())
    }

    async fn load(&self) -> NotebookRepositoryResult<Option<NotebookSnapshot>> {
        let state = self.state.read().map_err(|err| {
            NotebookRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.clone())
    }

    async fn clear(&self) -> NotebookRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            NotebookRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        *state = None;
        Ok(())
    }
}
