//! State-change notifications emitted by the engine after each mutation.

use crate::notebook::domain::{NotebookSnapshot, SettingsRecord, Task, TaskId};
use tokio::sync::mpsc;
use tracing::debug;

/// A committed in-memory mutation that durable storage should mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// Tasks were created or modified. A page fire arrives as one batch.
    TasksUpserted(Vec<Task>),
    /// A task was hard-deleted.
    TaskDeleted(TaskId),
    /// Settings or page overrides changed.
    SettingsChanged(SettingsRecord),
    /// The whole notebook was replaced by an import.
    Replaced(NotebookSnapshot),
    /// Everything was reset to defaults.
    Cleared,
}

impl StateChange {
    /// Short label used in log fields.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TasksUpserted(_) => "tasks_upserted",
            Self::TaskDeleted(_) => "task_deleted",
            Self::SettingsChanged(_) => "settings_changed",
            Self::Replaced(_) => "replaced",
            Self::Cleared => "cleared",
        }
    }
}

/// Receiving half drained by the persistence worker.
pub type ChangeReceiver = mpsc::UnboundedReceiver<StateChange>;

/// Fire-and-forget sender for [`StateChange`] notifications.
///
/// Sending never blocks and never fails from the caller's point of view: a
/// disabled notifier or a closed channel drops the change.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotifier {
    sender: Option<mpsc::UnboundedSender<StateChange>>,
}

impl ChangeNotifier {
    /// Creates a connected notifier and its receiver.
    #[must_use]
    pub fn channel() -> (Self, ChangeReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Creates a notifier that discards every change.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { sender: None }
    }

    /// Returns `true` when changes are forwarded somewhere.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.sender
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Publishes `change`.
    pub fn notify(&self, change: StateChange) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(err) = sender.send(change) {
            debug!(change = err.0.label(), "persistence channel closed, change dropped");
        }
    }
}
