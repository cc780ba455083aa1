//! Shared handle serializing several callers through one engine.

use super::{
    command::{CommandOutcome, NotebookCommand},
    engine::{NotebookEngine, NotebookResult},
};
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to a single [`NotebookEngine`].
///
/// Every clone talks to the same engine. Mutations go through
/// [`Self::dispatch`] only, so concurrent UI triggers apply one at a time.
pub struct NotebookHandle<C>
where
    C: Clock + Send + Sync,
{
    engine: Arc<Mutex<NotebookEngine<C>>>,
}

impl<C> Clone for NotebookHandle<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<C> NotebookHandle<C>
where
    C: Clock + Send + Sync,
{
    /// Wraps `engine`.
    #[must_use]
    pub fn new(engine: NotebookEngine<C>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Applies `command` to the shared engine.
    ///
    /// # Errors
    ///
    /// Propagates the engine's error for the command.
    pub fn dispatch(&self, command: NotebookCommand) -> NotebookResult<CommandOutcome> {
        self.lock().dispatch(command)
    }

    /// Runs a read-only query against the shared engine.
    #[must_use]
    pub fn read<T>(&self, query: impl FnOnce(&NotebookEngine<C>) -> T) -> T {
        query(&self.lock())
    }

    // Engine mutations are total, so a poisoned lock still guards a valid
    // engine.
    fn lock(&self) -> MutexGuard<'_, NotebookEngine<C>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
