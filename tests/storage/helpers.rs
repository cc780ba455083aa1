//! Shared fixtures for repository integration tests.

use autofocus::notebook::domain::{PageIndex, PersistedTaskData, Task, TaskId, TaskStatus};
use cap_std::{ambient_authority, fs_utf8::Dir};
use chrono::{DateTime, Utc};
use rstest::fixture;
use tempfile::TempDir;

/// Temporary directory opened as a capability handle.
///
/// The handle is only valid while `temp` is alive.
pub struct StorageDir {
    pub temp: TempDir,
    pub dir: Dir,
}

impl StorageDir {
    /// Opens another handle onto the same directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be reopened.
    pub fn reopen(&self) -> eyre::Result<Dir> {
        open_dir(&self.temp)
    }
}

fn open_dir(temp: &TempDir) -> eyre::Result<Dir> {
    let path = temp
        .path()
        .to_str()
        .ok_or_else(|| eyre::eyre!("temporary directory path is not UTF-8"))?;
    Ok(Dir::open_ambient_dir(path, ambient_authority())?)
}

/// Routes engine and worker logs through the test harness output.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn capture_logs() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .try_init()
        .ok();
}

/// Provides a fresh storage directory for each test.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or opened.
#[fixture]
pub fn storage() -> eyre::Result<StorageDir> {
    let temp = tempfile::tempdir()?;
    let dir = open_dir(&temp)?;
    Ok(StorageDir { temp, dir })
}

/// Builds an active task whose timestamps are `millis` after the epoch.
pub fn task_at(id: &str, text: &str, page: u32, millis: i64) -> Task {
    let at = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::from_string(id),
        text: text.to_owned(),
        details: None,
        status: TaskStatus::Active,
        page_index: PageIndex::new(page),
        created_at: at,
        updated_at: at,
    })
}
