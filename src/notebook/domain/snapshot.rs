//! Portable snapshot document used for export, import, and durable storage.
//!
//! The document is JSON with camel-case keys and epoch-millisecond
//! timestamps:
//!
//! ```json
//! {
//!   "version": 1,
//!   "exportedAt": "2026-01-04T09:30:00Z",
//!   "settings": { "pageSize": 5, "fontSize": 18 },
//!   "pageCapacities": { "0": 5, "1": 3 },
//!   "closedPages": [0],
//!   "tasks": [
//!     {
//!       "id": "6f1c...",
//!       "text": "Clean garage",
//!       "status": "dismissed",
//!       "pageIndex": 0,
//!       "createdAt": 1767519000000,
//!       "dismissedAt": 1767522600000,
//!       "updatedAt": 1767522600000
//!     }
//!   ]
//! }
//! ```

use super::{
    FontSize, MalformedImportError, PageIndex, PageLayout, PageSize, PersistedTaskData, Settings,
    SettingsRecord, Task, TaskId, TaskStatus, TaskStatusKind, TaskStore,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Opaque task identifier.
    pub id: String,
    /// Display text.
    pub text: String,
    /// Optional free-text details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// One of `active`, `completed`, or `dismissed`.
    pub status: String,
    /// Page the task was written on.
    pub page_index: u32,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Completion time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    /// Dismissal time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissed_at: Option<i64>,
    /// Latest mutation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl TaskRecord {
    /// Captures a domain task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        let status = task.status();
        Self {
            id: task.id().as_str().to_owned(),
            text: task.text().to_owned(),
            details: task.details().map(str::to_owned),
            status: status.kind().as_str().to_owned(),
            page_index: task.page_index().value(),
            created_at: task.created_at().timestamp_millis(),
            completed_at: status.completed_at().map(|at| at.timestamp_millis()),
            dismissed_at: status.dismissed_at().map(|at| at.timestamp_millis()),
            updated_at: Some(task.updated_at().timestamp_millis()),
        }
    }

    /// Rebuilds the domain task.
    ///
    /// A terminal record missing its own timestamp falls back to
    /// `updatedAt`, then `createdAt`; a timestamp that does not belong to
    /// the record's status is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedImportError`] for an empty id or text, an unknown
    /// status, or an out-of-range timestamp.
    pub fn into_task(self) -> Result<Task, MalformedImportError> {
        if self.id.trim().is_empty() {
            return Err(MalformedImportError::new("task id must not be empty"));
        }
        if self.text.trim().is_empty() {
            return Err(MalformedImportError::new(format!(
                "task {} has empty text",
                self.id
            )));
        }
        let kind = TaskStatusKind::try_from(self.status.as_str())
            .map_err(|err| MalformedImportError::new(format!("task {}: {err}", self.id)))?;
        let created_at = millis_to_utc(self.created_at, &self.id)?;
        let updated_at = self
            .updated_at
            .map(|millis| millis_to_utc(millis, &self.id))
            .transpose()?
            .unwrap_or(created_at);
        let terminal_at = |millis: Option<i64>| {
            millis
                .map(|value| millis_to_utc(value, &self.id))
                .transpose()
                .map(|at| at.unwrap_or(updated_at))
        };
        let status = match kind {
            TaskStatusKind::Active => TaskStatus::Active,
            TaskStatusKind::Completed => TaskStatus::Completed {
                completed_at: terminal_at(self.completed_at)?,
            },
            TaskStatusKind::Dismissed => TaskStatus::Dismissed {
                dismissed_at: terminal_at(self.dismissed_at)?,
            },
        };
        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::from_string(self.id),
            text: self.text,
            details: self.details,
            status,
            page_index: PageIndex::new(self.page_index),
            created_at,
            updated_at,
        }))
    }
}

fn millis_to_utc(millis: i64, task_id: &str) -> Result<DateTime<Utc>, MalformedImportError> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        MalformedImportError::new(format!("task {task_id} has out-of-range timestamp {millis}"))
    })
}

/// Serialized global settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    /// Default capacity for new pages.
    pub page_size: u32,
    /// Presentation font size.
    pub font_size: u32,
}

/// Complete notebook document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookSnapshot {
    /// Format version, currently [`SNAPSHOT_VERSION`].
    pub version: u32,
    /// When the document was produced, in RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    /// Global settings.
    pub settings: SettingsDocument,
    /// Capacity frozen per page.
    #[serde(default)]
    pub page_capacities: BTreeMap<u32, u32>,
    /// Pages sealed by a resize.
    #[serde(default)]
    pub closed_pages: Vec<u32>,
    /// Every task in store order.
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

impl NotebookSnapshot {
    /// Captures the full notebook state.
    #[must_use]
    pub fn capture(
        store: &TaskStore,
        record: &SettingsRecord,
        exported_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at: exported_at.map(|at| at.to_rfc3339()),
            settings: settings_document(&record.settings),
            page_capacities: capacities_document(&record.layout),
            closed_pages: record
                .layout
                .closed_pages()
                .iter()
                .map(|page| page.value())
                .collect(),
            tasks: store.iter().map(TaskRecord::from_task).collect(),
        }
    }

    /// Validates the snapshot and converts it into an import document with
    /// every field present.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedImportError`] when a task record or size is
    /// invalid.
    pub fn into_document(self) -> Result<ImportDocument, MalformedImportError> {
        let tasks = parse_tasks(self.tasks)?;
        Ok(ImportDocument {
            tasks: Some(tasks),
            page_size: positive(self.settings.page_size, PageSize::new)?,
            font_size: positive(self.settings.font_size, FontSize::new)?,
            page_capacities: Some(parse_capacities(self.page_capacities)?),
            closed_pages: Some(self.closed_pages.into_iter().map(PageIndex::new).collect()),
        })
    }
}

/// Serializes settings for persistence.
#[must_use]
pub fn settings_document(settings: &Settings) -> SettingsDocument {
    SettingsDocument {
        page_size: settings.page_size().value(),
        font_size: settings.font_size().value(),
    }
}

fn capacities_document(layout: &PageLayout) -> BTreeMap<u32, u32> {
    layout
        .capacities()
        .iter()
        .map(|(page, size)| (page.value(), size.value()))
        .collect()
}

/// Validated, possibly partial, import payload.
///
/// Fields left as `None` were absent from the payload and must leave the
/// current state untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDocument {
    /// Replacement task list.
    pub tasks: Option<Vec<Task>>,
    /// Replacement global page size.
    pub page_size: Option<PageSize>,
    /// Replacement font size.
    pub font_size: Option<FontSize>,
    /// Replacement frozen capacities.
    pub page_capacities: Option<BTreeMap<PageIndex, PageSize>>,
    /// Replacement closed page set.
    pub closed_pages: Option<BTreeSet<PageIndex>>,
}

impl ImportDocument {
    /// Validates an untyped JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedImportError`] when the payload is not an object or
    /// a present field has an unexpected shape.
    pub fn from_value(value: &Value) -> Result<Self, MalformedImportError> {
        let object = value
            .as_object()
            .ok_or_else(|| MalformedImportError::new("payload must be a JSON object"))?;

        let tasks = field::<Vec<TaskRecord>>(object, "tasks", "an array of task records")?
            .map(parse_tasks)
            .transpose()?;

        let settings =
            field::<PartialSettings>(object, "settings", "an object")?.unwrap_or_default();
        let page_size = settings
            .page_size
            .map(|size| positive(size, PageSize::new))
            .transpose()?
            .flatten();
        let font_size = settings
            .font_size
            .map(|size| positive(size, FontSize::new))
            .transpose()?
            .flatten();

        let page_capacities = field::<BTreeMap<u32, u32>>(
            object,
            "pageCapacities",
            "an object of page capacities",
        )?
        .map(parse_capacities)
        .transpose()?;

        let closed_pages = field::<Vec<u32>>(object, "closedPages", "an array of page indices")?
            .map(|pages| pages.into_iter().map(PageIndex::new).collect());

        Ok(Self {
            tasks,
            page_size,
            font_size,
            page_capacities,
            closed_pages,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialSettings {
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    font_size: Option<u32>,
}

/// Reads an optional field, treating `null` as absent.
fn field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
    expected: &str,
) -> Result<Option<T>, MalformedImportError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|err| MalformedImportError::new(format!("`{key}` must be {expected}: {err}"))),
    }
}

/// Zero sizes are treated as "not provided"; any other value must validate.
fn positive<T, E: std::fmt::Display>(
    value: u32,
    build: impl FnOnce(u32) -> Result<T, E>,
) -> Result<Option<T>, MalformedImportError> {
    if value == 0 {
        return Ok(None);
    }
    build(value)
        .map(Some)
        .map_err(|err| MalformedImportError::new(err.to_string()))
}

/// Converts every record, rejecting ids that appear more than once.
fn parse_tasks(records: Vec<TaskRecord>) -> Result<Vec<Task>, MalformedImportError> {
    let mut seen = BTreeSet::new();
    records
        .into_iter()
        .map(|record| {
            let task = record.into_task()?;
            if !seen.insert(task.id().clone()) {
                return Err(MalformedImportError::new(format!(
                    "task id {} appears more than once",
                    task.id()
                )));
            }
            Ok(task)
        })
        .collect()
}

fn parse_capacities(
    raw: BTreeMap<u32, u32>,
) -> Result<BTreeMap<PageIndex, PageSize>, MalformedImportError> {
    raw.into_iter()
        .map(|(page, size)| {
            PageSize::new(size)
                .map(|capacity| (PageIndex::new(page), capacity))
                .map_err(|err| MalformedImportError::new(format!("page {page}: {err}")))
        })
        .collect()
}
