//! Application services for the notebook engine.

mod changes;
mod command;
mod engine;
mod handle;
mod persistence;

pub use changes::{ChangeNotifier, ChangeReceiver, StateChange};
pub use command::{CommandOutcome, NotebookCommand};
pub use engine::{NotebookEngine, NotebookError, NotebookResult, PageCursor};
pub use handle::NotebookHandle;
pub use persistence::{PersistenceWorker, apply_change, spawn_persistence_worker};
