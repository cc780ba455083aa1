//! Snapshot mutations shared by the document-backed adapters.

use crate::notebook::domain::{
    NotebookSnapshot, SettingsRecord, Task, TaskId, TaskRecord, TaskStore,
};

/// Returns a snapshot holding default settings and no tasks.
pub(super) fn empty_snapshot() -> NotebookSnapshot {
    NotebookSnapshot::capture(&TaskStore::new(), &SettingsRecord::default(), None)
}

/// Upserts task records, keeping a stored record that is strictly newer.
pub(super) fn upsert_records(snapshot: &mut NotebookSnapshot, tasks: &[Task]) {
    for task in tasks {
        let incoming = TaskRecord::from_task(task);
        match snapshot
            .tasks
            .iter_mut()
            .find(|stored| stored.id == incoming.id)
        {
            Some(stored) if last_write(stored) > last_write(&incoming) => {}
            Some(stored) => *stored = incoming,
            None => snapshot.tasks.push(incoming),
        }
    }
}

/// Removes the record for `id`, if present.
pub(super) fn delete_record(snapshot: &mut NotebookSnapshot, id: &TaskId) {
    snapshot.tasks.retain(|stored| stored.id != id.as_str());
}

/// Overwrites settings, capacities, and closed pages.
pub(super) fn apply_settings(snapshot: &mut NotebookSnapshot, record: &SettingsRecord) {
    let captured = NotebookSnapshot::capture(&TaskStore::new(), record, None);
    snapshot.settings = captured.settings;
    snapshot.page_capacities = captured.page_capacities;
    snapshot.closed_pages = captured.closed_pages;
}

fn last_write(record: &TaskRecord) -> i64 {
    record.updated_at.unwrap_or(record.created_at)
}
