//! JSON file notebook repository.
//!
//! The whole notebook lives in one snapshot document inside a capability
//! directory. Every write goes to a temporary sibling first and is renamed
//! over the target, so readers never observe a half-written document.

use super::document::{apply_settings, delete_record, empty_snapshot, upsert_records};
use crate::notebook::{
    domain::{NotebookSnapshot, SettingsRecord, Task, TaskId},
    ports::{NotebookRepository, NotebookRepositoryError, NotebookRepositoryResult},
};
use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use std::{io, sync::Arc};
use tokio::sync::Mutex;

/// Default document name inside the storage directory.
pub const DEFAULT_DOCUMENT_NAME: &str = "notebook.json";

/// Notebook repository backed by a JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileNotebookRepository {
    dir: Arc<Dir>,
    document: String,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileNotebookRepository {
    /// Creates a repository storing [`DEFAULT_DOCUMENT_NAME`] in `dir`.
    #[must_use]
    pub fn new(dir: Dir) -> Self {
        Self::with_document_name(dir, DEFAULT_DOCUMENT_NAME)
    }

    /// Creates a repository storing `document` in `dir`.
    #[must_use]
    pub fn with_document_name(dir: Dir, document: impl Into<String>) -> Self {
        Self {
            dir: Arc::new(dir),
            document: document.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the document name inside the storage directory.
    #[must_use]
    pub fn document_name(&self) -> &str {
        &self.document
    }

    async fn read(&self) -> NotebookRepositoryResult<Option<NotebookSnapshot>> {
        let dir = Arc::clone(&self.dir);
        let document = self.document.clone();
        let contents = run_blocking(move || match dir.read_to_string(&document) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await?;
        contents
            .map(|raw| serde_json::from_str(&raw).map_err(NotebookRepositoryError::serialization))
            .transpose()
    }

    async fn write(&self, snapshot: &NotebookSnapshot) -> NotebookRepositoryResult<()> {
        let encoded =
            serde_json::to_vec_pretty(snapshot).map_err(NotebookRepositoryError::serialization)?;
        let dir = Arc::clone(&self.dir);
        let document = self.document.clone();
        run_blocking(move || {
            let staging = format!("{document}.tmp");
            dir.write(&staging, encoded)?;
            dir.rename(&staging, &dir, &document)
        })
        .await
    }

    async fn mutate(
        &self,
        apply: impl FnOnce(&mut NotebookSnapshot) + Send,
    ) -> NotebookRepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.read().await?.unwrap_or_else(empty_snapshot);
        apply(&mut snapshot);
        self.write(&snapshot).await
    }
}

async fn run_blocking<T: Send + 'static>(
    operation: impl FnOnce() -> io::Result<T> + Send + 'static,
) -> NotebookRepositoryResult<T> {
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|err| NotebookRepositoryError::persistence(io::Error::other(err.to_string())))?
        .map_err(NotebookRepositoryError::persistence)
}

#[async_trait]
impl NotebookRepository for JsonFileNotebookRepository {
    async fn upsert_tasks(&self, tasks: &[Task]) -> NotebookRepositoryResult<()> {
        self.mutate(|snapshot| upsert_records(snapshot, tasks)).await
    }

    async fn delete_task(&self, id: &TaskId) -> NotebookRepositoryResult<()> {
        self.mutate(|snapshot| delete_record(snapshot, id)).await
    }

    async fn save_settings(&self, record: &SettingsRecord) -> NotebookRepositoryResult<()> {
        self.mutate(|snapshot| apply_settings(snapshot, record)).await
    }

    async fn replace(&self, snapshot: &NotebookSnapshot) -> NotebookRepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write(snapshot).await
    }

    async fn load(&self) -> NotebookRepositoryResult<Option<NotebookSnapshot>> {
        self.read().await
    }

    async fn clear(&self) -> NotebookRepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        let dir = Arc::clone(&self.dir);
        let document = self.document.clone();
        run_blocking(move || match dir.remove_file(&document) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        })
        .await
    }
}
