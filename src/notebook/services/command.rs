//! Command path: every mutation as a value, applied by one reducer.

use super::engine::{NotebookEngine, NotebookResult};
use crate::notebook::domain::{PageIndex, PageResize, Task, TaskId, TaskPatch};
use mockable::Clock;
use serde_json::Value;

/// A mutation requested by a UI collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum NotebookCommand {
    /// Write a new task on the placement page.
    AddTask {
        /// Display text; must not be blank.
        text: String,
        /// Optional free-text details.
        details: Option<String>,
    },
    /// Edit a task's text or details.
    UpdateTask {
        /// Task to edit.
        id: TaskId,
        /// Fields to change.
        patch: TaskPatch,
    },
    /// Complete an active task.
    CompleteTask(TaskId),
    /// Fire a page, dismissing its active tasks.
    DismissPage(PageIndex),
    /// Hard-delete a task.
    DeleteTask(TaskId),
    /// Record that the user acted on the current page.
    MarkActionTaken,
    /// Leave the current page.
    AdvancePage,
    /// Jump to a page without dismissal.
    GoToPage(PageIndex),
    /// Change the page size.
    SetPageSize(u32),
    /// Change the presentation font size.
    SetFontSize(u32),
    /// Clear everything back to defaults.
    ResetAll,
    /// Import a JSON payload.
    Import(Value),
}

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A single task was created, edited, completed, or deleted.
    Task(Task),
    /// Tasks dismissed by a page fire.
    Dismissed(Vec<Task>),
    /// The cursor moved to this page.
    Page(PageIndex),
    /// The page size changed with this frontier reconciliation.
    Resized(PageResize),
    /// The command has no payload to report.
    Applied,
}

impl<C> NotebookEngine<C>
where
    C: Clock + Send + Sync,
{
    /// Applies `command`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation; state is unchanged
    /// when an error is returned.
    pub fn dispatch(&mut self, command: NotebookCommand) -> NotebookResult<CommandOutcome> {
        let outcome = match command {
            NotebookCommand::AddTask { text, details } => {
                CommandOutcome::Task(self.add_task(text, details)?)
            }
            NotebookCommand::UpdateTask { id, patch } => {
                CommandOutcome::Task(self.update_task(&id, patch)?)
            }
            NotebookCommand::CompleteTask(id) => CommandOutcome::Task(self.complete_task(&id)?),
            NotebookCommand::DismissPage(page) => {
                CommandOutcome::Dismissed(self.dismiss_page_tasks(page))
            }
            NotebookCommand::DeleteTask(id) => CommandOutcome::Task(self.delete_task(&id)?),
            NotebookCommand::MarkActionTaken => {
                self.mark_action_taken();
                CommandOutcome::Applied
            }
            NotebookCommand::AdvancePage => CommandOutcome::Page(self.advance_page()),
            NotebookCommand::GoToPage(page) => {
                self.go_to_page(page);
                CommandOutcome::Page(page)
            }
            NotebookCommand::SetPageSize(size) => CommandOutcome::Resized(self.set_page_size(size)?),
            NotebookCommand::SetFontSize(size) => {
                self.set_font_size(size)?;
                CommandOutcome::Applied
            }
            NotebookCommand::ResetAll => {
                self.reset_all();
                CommandOutcome::Applied
            }
            NotebookCommand::Import(payload) => {
                self.import_value(&payload)?;
                CommandOutcome::Applied
            }
        };
        Ok(outcome)
    }
}
