//! End-to-end tests: engine mutations mirrored to storage by the worker.

use super::helpers::{StorageDir, capture_logs, storage};
use autofocus::notebook::{
    adapters::{file::JsonFileNotebookRepository, memory::InMemoryNotebookRepository},
    config::NotebookConfig,
    domain::{PageIndex, TaskStatusKind, TaskStore},
    ports::NotebookRepository,
    services::{
        CommandOutcome, NotebookCommand, NotebookEngine, NotebookHandle, spawn_persistence_worker,
    },
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

/// Stored timestamps are millisecond precision, so compare identity,
/// placement, and status only.
fn summarize(tasks: &TaskStore) -> Vec<(String, PageIndex, TaskStatusKind)> {
    tasks
        .iter()
        .map(|task| {
            (
                task.id().as_str().to_owned(),
                task.page_index(),
                task.status().kind(),
            )
        })
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notebook_survives_a_restart(storage: eyre::Result<StorageDir>) -> eyre::Result<()> {
    capture_logs();
    let store = storage?;
    let config = NotebookConfig::default();
    let repository = Arc::new(JsonFileNotebookRepository::new(store.reopen()?));
    let (notifier, worker) = spawn_persistence_worker(Arc::clone(&repository), config.persistence());
    let mut engine = NotebookEngine::new(config, Arc::new(DefaultClock)).with_notifier(notifier);

    for n in 0..8 {
        engine.add_task(format!("Errand {n}"), None)?;
    }
    engine.set_page_size(2)?;
    engine.set_font_size(21)?;
    engine.go_to_page(PageIndex::FIRST);
    engine.advance_page();
    let before = summarize(engine.tasks());
    drop(engine);
    worker.await?;

    let reopened = JsonFileNotebookRepository::new(store.reopen()?);
    let restored = NotebookEngine::load(&reopened, config, Arc::new(DefaultClock)).await;

    eyre::ensure!(summarize(restored.tasks()) == before);
    eyre::ensure!(restored.settings().page_size().value() == 2);
    eyre::ensure!(restored.settings().font_size().value() == 21);
    eyre::ensure!(restored.is_page_closed(PageIndex::new(1)));
    eyre::ensure!(restored.page_capacity(PageIndex::FIRST).value() == 5);
    eyre::ensure!(restored.current_page() == PageIndex::new(1));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn import_and_reset_replace_stored_state() -> eyre::Result<()> {
    capture_logs();
    let repository = Arc::new(InMemoryNotebookRepository::new());
    let config = NotebookConfig::default();
    let (notifier, worker) = spawn_persistence_worker(Arc::clone(&repository), config.persistence());
    let handle = NotebookHandle::new(
        NotebookEngine::new(config, Arc::new(DefaultClock)).with_notifier(notifier),
    );

    let imported = handle.dispatch(NotebookCommand::Import(json!({
        "settings": { "pageSize": 4, "fontSize": 16 },
        "tasks": [
            { "id": "x", "text": "Imported", "status": "active", "pageIndex": 0,
              "createdAt": 1_767_519_000_000_i64 }
        ]
    })))?;
    eyre::ensure!(imported == CommandOutcome::Applied);
    let reset = handle.clone();
    tokio::task::spawn_blocking(move || reset.dispatch(NotebookCommand::ResetAll)).await??;
    drop(handle);
    worker.await?;

    eyre::ensure!(repository.load().await?.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn commands_from_many_tasks_serialize_through_one_engine() -> eyre::Result<()> {
    capture_logs();
    let handle = NotebookHandle::new(NotebookEngine::new(
        NotebookConfig::default(),
        Arc::new(DefaultClock),
    ));

    let writers: Vec<_> = (0..8)
        .map(|n| {
            let writer = handle.clone();
            tokio::task::spawn_blocking(move || {
                writer.dispatch(NotebookCommand::AddTask {
                    text: format!("Parallel {n}"),
                    details: None,
                })
            })
        })
        .collect();
    for writer in writers {
        writer.await??;
    }

    let (count, pages, active) = handle.read(|engine| {
        (
            engine.tasks().len(),
            engine.max_page_index(),
            engine
                .tasks()
                .iter()
                .filter(|task| task.status().kind() == TaskStatusKind::Active)
                .count(),
        )
    });
    eyre::ensure!(count == 8);
    eyre::ensure!(pages == PageIndex::new(1));
    eyre::ensure!(active == 8);
    Ok(())
}
