//! Integration tests for the in-memory repository.

use super::helpers::task_at;
use autofocus::notebook::{
    adapters::memory::InMemoryNotebookRepository,
    domain::{NotebookSnapshot, SettingsRecord, TaskId, TaskStore},
    ports::NotebookRepository,
};
use rstest::{fixture, rstest};

#[fixture]
fn repo() -> InMemoryNotebookRepository {
    InMemoryNotebookRepository::new()
}

#[rstest]
#[tokio::test]
async fn clones_share_state(repo: InMemoryNotebookRepository) -> eyre::Result<()> {
    let other = repo.clone();

    repo.upsert_tasks(&[task_at("a", "Shared", 0, 1_000)]).await?;

    let loaded = other.load().await?.ok_or_else(|| eyre::eyre!("stored"))?;
    eyre::ensure!(loaded.tasks.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn equal_timestamps_take_the_incoming_record(
    repo: InMemoryNotebookRepository,
) -> eyre::Result<()> {
    repo.upsert_tasks(&[task_at("a", "First", 0, 1_000)]).await?;

    repo.upsert_tasks(&[task_at("a", "Second", 0, 1_000)]).await?;

    let loaded = repo.load().await?.ok_or_else(|| eyre::eyre!("stored"))?;
    let stored: Vec<&str> = loaded.tasks.iter().map(|r| r.text.as_str()).collect();
    eyre::ensure!(stored == vec!["Second"]);
    Ok(())
}

#[tokio::test]
async fn seeded_repository_can_be_cleared() -> eyre::Result<()> {
    let seeded = InMemoryNotebookRepository::with_snapshot(NotebookSnapshot::capture(
        &TaskStore::from_tasks(vec![task_at("a", "Seeded", 0, 1_000)]),
        &SettingsRecord::default(),
        None,
    ));
    eyre::ensure!(seeded.load().await?.is_some());

    seeded.delete_task(&TaskId::from_string("a")).await?;
    let emptied = seeded.load().await?.ok_or_else(|| eyre::eyre!("still stored"))?;
    eyre::ensure!(emptied.tasks.is_empty());

    seeded.clear().await?;
    eyre::ensure!(seeded.load().await?.is_none());
    Ok(())
}
