//! Task record and its lifecycle status.

use super::{NotebookDomainError, PageIndex, ParseTaskStatusError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Status discriminant without the timestamp payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatusKind {
    /// Task is still open.
    Active,
    /// Task was finished.
    Completed,
    /// Task was burned without being finished.
    Dismissed,
}

impl TaskStatusKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Dismissed => "dismissed",
        }
    }
}

impl TryFrom<&str> for TaskStatusKind {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task lifecycle status.
///
/// Terminal variants carry the moment they were entered, so a task can never
/// hold a completion time while dismissed or the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Task is still open.
    Active,
    /// Task was finished.
    Completed {
        /// When the task was completed.
        completed_at: DateTime<Utc>,
    },
    /// Task was burned without being finished.
    Dismissed {
        /// When the task was dismissed.
        dismissed_at: DateTime<Utc>,
    },
}

impl TaskStatus {
    /// Returns the status discriminant.
    #[must_use]
    pub const fn kind(self) -> TaskStatusKind {
        match self {
            Self::Active => TaskStatusKind::Active,
            Self::Completed { .. } => TaskStatusKind::Completed,
            Self::Dismissed { .. } => TaskStatusKind::Dismissed,
        }
    }

    /// Returns `true` while the task is open.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` for completed and dismissed tasks.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Returns the completion time for completed tasks.
    #[must_use]
    pub const fn completed_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Completed { completed_at } => Some(completed_at),
            Self::Active | Self::Dismissed { .. } => None,
        }
    }

    /// Returns the dismissal time for dismissed tasks.
    #[must_use]
    pub const fn dismissed_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Dismissed { dismissed_at } => Some(dismissed_at),
            Self::Active | Self::Completed { .. } => None,
        }
    }
}

/// Partial update applied by `update_task`.
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    text: Option<String>,
    details: Option<Option<String>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the task text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Replaces the task details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(Some(details.into()));
        self
    }

    /// Removes the task details.
    #[must_use]
    pub fn without_details(mut self) -> Self {
        self.details = Some(None);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.details.is_none()
    }
}

/// A single entry written on a notebook page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    text: String,
    details: Option<String>,
    status: TaskStatus,
    page_index: PageIndex,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted display text.
    pub text: String,
    /// Persisted free-text details, if any.
    pub details: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Page the task was written on.
    pub page_index: PageIndex,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new active task on the given page.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookDomainError::EmptyTaskText`] when `text` is blank.
    pub fn new(
        text: impl Into<String>,
        details: Option<String>,
        page_index: PageIndex,
        clock: &impl Clock,
    ) -> Result<Self, NotebookDomainError> {
        let validated = validate_text(text.into())?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            text: validated,
            details,
            status: TaskStatus::Active,
            page_index,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            text: data.text,
            details: data.details,
            status: data.status,
            page_index: data.page_index,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the free-text details, if any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns `true` while the task is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the page the task was written on.
    #[must_use]
    pub const fn page_index(&self) -> PageIndex {
        self.page_index
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks an active task as completed.
    ///
    /// Returns `false` and leaves the task untouched when it is already
    /// terminal.
    pub fn complete(&mut self, clock: &impl Clock) -> bool {
        if !self.is_active() {
            return false;
        }
        let timestamp = clock.utc();
        self.status = TaskStatus::Completed {
            completed_at: timestamp,
        };
        self.updated_at = timestamp;
        true
    }

    /// Marks an active task as dismissed.
    ///
    /// Returns `false` and leaves the task untouched when it is already
    /// terminal.
    pub fn dismiss(&mut self, clock: &impl Clock) -> bool {
        if !self.is_active() {
            return false;
        }
        let timestamp = clock.utc();
        self.status = TaskStatus::Dismissed {
            dismissed_at: timestamp,
        };
        self.updated_at = timestamp;
        true
    }

    /// Applies a partial edit. Allowed in every status.
    ///
    /// The patch is validated before any field changes.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookDomainError::EmptyTaskText`] when the patch sets a
    /// blank text.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), NotebookDomainError> {
        let text = patch.text.map(validate_text).transpose()?;
        if let Some(new_text) = text {
            self.text = new_text;
        }
        if let Some(new_details) = patch.details {
            self.details = new_details;
        }
        self.updated_at = clock.utc();
        Ok(())
    }
}

fn validate_text(text: String) -> Result<String, NotebookDomainError> {
    if text.trim().is_empty() {
        return Err(NotebookDomainError::EmptyTaskText);
    }
    Ok(text)
}
