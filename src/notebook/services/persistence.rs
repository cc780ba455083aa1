//! Background worker mirroring state changes into a repository.

use super::changes::{ChangeNotifier, ChangeReceiver, StateChange};
use crate::notebook::{
    config::PersistenceConfig,
    ports::{NotebookRepository, NotebookRepositoryResult},
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Drains [`StateChange`] notifications into a [`NotebookRepository`].
///
/// Each change is retried independently with linear backoff. A change that
/// exhausts its attempts is logged and dropped; the in-memory engine stays
/// authoritative either way.
pub struct PersistenceWorker<R>
where
    R: NotebookRepository + ?Sized,
{
    repository: Arc<R>,
    receiver: ChangeReceiver,
    config: PersistenceConfig,
}

impl<R> PersistenceWorker<R>
where
    R: NotebookRepository + ?Sized,
{
    /// Creates a worker reading from `receiver`.
    #[must_use]
    pub const fn new(repository: Arc<R>, receiver: ChangeReceiver, config: PersistenceConfig) -> Self {
        Self {
            repository,
            receiver,
            config,
        }
    }

    /// Processes changes until every notifier is dropped.
    ///
    /// Returns how many changes were persisted successfully.
    pub async fn run(self) -> usize {
        let Self {
            repository,
            mut receiver,
            config,
        } = self;
        let mut persisted = 0;
        while let Some(change) = receiver.recv().await {
            if persist_with_retry(&*repository, config, &change).await {
                persisted += 1;
            }
        }
        debug!(persisted, "persistence worker stopped");
        persisted
    }
}

async fn persist_with_retry<R>(repository: &R, config: PersistenceConfig, change: &StateChange) -> bool
where
    R: NotebookRepository + ?Sized,
{
    let max_attempts = config.max_attempts();
    let mut attempt: u32 = 1;
    loop {
        match apply_change(repository, change).await {
            Ok(()) => return true,
            Err(err) if attempt < max_attempts => {
                warn!(
                    change = change.label(),
                    attempt,
                    error = %err,
                    "persisting change failed, retrying"
                );
                tokio::time::sleep(config.retry_backoff().saturating_mul(attempt)).await;
                attempt += 1;
            }
            Err(err) => {
                error!(
                    change = change.label(),
                    attempts = attempt,
                    error = %err,
                    "persisting change failed, giving up"
                );
                return false;
            }
        }
    }
}

/// Applies one change to the repository.
///
/// # Errors
///
/// Propagates the repository error.
pub async fn apply_change<R>(repository: &R, change: &StateChange) -> NotebookRepositoryResult<()>
where
    R: NotebookRepository + ?Sized,
{
    match change {
        StateChange::TasksUpserted(tasks) => repository.upsert_tasks(tasks).await,
        StateChange::TaskDeleted(id) => repository.delete_task(id).await,
        StateChange::SettingsChanged(record) => repository.save_settings(record).await,
        StateChange::Replaced(snapshot) => repository.replace(snapshot).await,
        StateChange::Cleared => repository.clear().await,
    }
}

/// Connects a notifier to a worker running on the current Tokio runtime.
///
/// Attach the returned notifier to the engine; the worker finishes once the
/// engine and every clone of the notifier are dropped.
#[must_use]
pub fn spawn_persistence_worker<R>(
    repository: Arc<R>,
    config: PersistenceConfig,
) -> (ChangeNotifier, JoinHandle<usize>)
where
    R: NotebookRepository + ?Sized + 'static,
{
    let (notifier, receiver) = ChangeNotifier::channel();
    let worker = PersistenceWorker::new(repository, receiver, config);
    (notifier, tokio::spawn(worker.run()))
}
