//! Integration tests for the JSON file repository.

use super::helpers::{StorageDir, storage, task_at};
use autofocus::notebook::{
    adapters::file::{DEFAULT_DOCUMENT_NAME, JsonFileNotebookRepository},
    domain::{
        FontSize, NotebookSnapshot, PageIndex, PageLayout, PageSize, Settings, SettingsRecord,
        TaskId, TaskStore,
    },
    ports::{NotebookRepository, NotebookRepositoryError},
};
use rstest::rstest;
use std::collections::{BTreeMap, BTreeSet};

fn texts(snapshot: &NotebookSnapshot) -> Vec<&str> {
    snapshot
        .tasks
        .iter()
        .map(|record| record.text.as_str())
        .collect()
}

#[rstest]
#[tokio::test]
async fn missing_document_loads_as_none(storage: eyre::Result<StorageDir>) -> eyre::Result<()> {
    let store = storage?;
    let repo = JsonFileNotebookRepository::new(store.reopen()?);

    eyre::ensure!(repo.load().await?.is_none());
    eyre::ensure!(repo.document_name() == DEFAULT_DOCUMENT_NAME);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn upserts_survive_a_new_repository_handle(
    storage: eyre::Result<StorageDir>,
) -> eyre::Result<()> {
    let store = storage?;
    let writer = JsonFileNotebookRepository::new(store.reopen()?);
    writer
        .upsert_tasks(&[task_at("a", "First", 0, 1_000), task_at("b", "Second", 0, 2_000)])
        .await?;

    let reader = JsonFileNotebookRepository::new(store.reopen()?);
    let loaded = reader
        .load()
        .await?
        .ok_or_else(|| eyre::eyre!("document was written"))?;

    eyre::ensure!(texts(&loaded) == vec!["First", "Second"]);
    eyre::ensure!(!store.dir.exists(format!("{DEFAULT_DOCUMENT_NAME}.tmp")));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn stale_upsert_does_not_overwrite_newer_record(
    storage: eyre::Result<StorageDir>,
) -> eyre::Result<()> {
    let store = storage?;
    let repo = JsonFileNotebookRepository::new(store.reopen()?);
    repo.upsert_tasks(&[task_at("a", "Newer", 0, 5_000)]).await?;

    repo.upsert_tasks(&[task_at("a", "Older", 0, 4_000)]).await?;

    let loaded = repo.load().await?.ok_or_else(|| eyre::eyre!("stored"))?;
    eyre::ensure!(texts(&loaded) == vec!["Newer"]);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn settings_are_stored_beside_tasks(storage: eyre::Result<StorageDir>) -> eyre::Result<()> {
    let store = storage?;
    let repo = JsonFileNotebookRepository::with_document_name(store.reopen()?, "book.json");
    repo.upsert_tasks(&[task_at("a", "Kept", 0, 1_000)]).await?;
    let record = SettingsRecord {
        settings: Settings::new(PageSize::new(3)?, FontSize::new(22)?),
        layout: PageLayout::from_parts(
            BTreeMap::from([(PageIndex::FIRST, PageSize::DEFAULT)]),
            BTreeSet::from([PageIndex::FIRST]),
        ),
    };

    repo.save_settings(&record).await?;

    let loaded = repo.load().await?.ok_or_else(|| eyre::eyre!("stored"))?;
    eyre::ensure!(loaded.settings.page_size == 3);
    eyre::ensure!(loaded.settings.font_size == 22);
    eyre::ensure!(loaded.closed_pages == vec![0]);
    eyre::ensure!(texts(&loaded) == vec!["Kept"]);
    eyre::ensure!(store.dir.exists("book.json"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn delete_replace_and_clear(storage: eyre::Result<StorageDir>) -> eyre::Result<()> {
    let store = storage?;
    let repo = JsonFileNotebookRepository::new(store.reopen()?);
    repo.upsert_tasks(&[task_at("a", "One", 0, 1_000), task_at("b", "Two", 0, 1_000)])
        .await?;

    repo.delete_task(&TaskId::from_string("a")).await?;
    repo.delete_task(&TaskId::from_string("never-stored")).await?;
    let after_delete = repo.load().await?.ok_or_else(|| eyre::eyre!("stored"))?;
    eyre::ensure!(texts(&after_delete) == vec!["Two"]);

    let replacement = NotebookSnapshot::capture(
        &TaskStore::from_tasks(vec![task_at("c", "Three", 2, 3_000)]),
        &SettingsRecord::default(),
        None,
    );
    repo.replace(&replacement).await?;
    eyre::ensure!(repo.load().await? == Some(replacement));

    repo.clear().await?;
    repo.clear().await?;
    eyre::ensure!(repo.load().await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn corrupt_document_is_a_serialization_error(
    storage: eyre::Result<StorageDir>,
) -> eyre::Result<()> {
    let store = storage?;
    store.dir.write(DEFAULT_DOCUMENT_NAME, "{ not json")?;
    let repo = JsonFileNotebookRepository::new(store.reopen()?);

    let result = repo.load().await;

    eyre::ensure!(matches!(result, Err(NotebookRepositoryError::Serialization(_))));
    Ok(())
}
