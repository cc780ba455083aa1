//! Domain model for the paged notebook.
//!
//! Tasks live in an ordered store; pages are a pure grouping of that store
//! by page index, resolved against the settings overrides. Nothing in this
//! module performs I/O.

mod error;
mod ids;
mod policy;
mod settings;
mod snapshot;
mod store;
mod suggestion;
mod task;

pub use error::{MalformedImportError, NotebookDomainError, ParseTaskStatusError};
pub use ids::{FontSize, PageIndex, PageSize, TaskId};
pub use policy::{PagePolicy, PageResize, PageSummary};
pub(crate) use policy::apply_resize;
pub use settings::{PageLayout, Settings, SettingsRecord};
pub use snapshot::{
    ImportDocument, NotebookSnapshot, SNAPSHOT_VERSION, SettingsDocument, TaskRecord,
    settings_document,
};
pub use store::TaskStore;
pub use suggestion::{MAX_SUGGESTIONS, MIN_QUERY_CHARS, SuggestionIndex};
pub use task::{PersistedTaskData, Task, TaskPatch, TaskStatus, TaskStatusKind};
