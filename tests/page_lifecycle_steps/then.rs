//! Then steps for page lifecycle BDD scenarios.

use super::world::PageLifecycleWorld;
use autofocus::notebook::domain::{PageIndex, TaskStatusKind};
use rstest_bdd_macros::then;

fn ensure_page_statuses(
    world: &PageLifecycleWorld,
    page: u32,
    expected: TaskStatusKind,
) -> Result<(), eyre::Report> {
    let tasks = world.engine.page_tasks(PageIndex::new(page));
    eyre::ensure!(!tasks.is_empty(), "page {page} holds no tasks");
    if let Some(task) = tasks.iter().find(|task| task.status().kind() != expected) {
        return Err(eyre::eyre!(
            "expected every task on page {page} to be {}, found {} for {:?}",
            expected.as_str(),
            task.status().kind().as_str(),
            task.text()
        ));
    }
    Ok(())
}

#[then("the task lands on page {page:u32}")]
fn task_lands_on_page(world: &PageLifecycleWorld, page: u32) -> Result<(), eyre::Report> {
    let task = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing added task in scenario world"))?;
    eyre::ensure!(
        task.page_index() == PageIndex::new(page),
        "expected page {page}, found page {}",
        task.page_index()
    );
    Ok(())
}

#[then("page {page:u32} is full")]
fn page_is_full(world: &PageLifecycleWorld, page: u32) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.engine.is_page_full(PageIndex::new(page)),
        "page {page} is not full"
    );
    Ok(())
}

#[then("page {page:u32} is closed")]
fn page_is_closed(world: &PageLifecycleWorld, page: u32) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.engine.is_page_closed(PageIndex::new(page)),
        "page {page} is not closed"
    );
    Ok(())
}

#[then("page {page:u32} has capacity {capacity:u32}")]
fn page_has_capacity(
    world: &PageLifecycleWorld,
    page: u32,
    capacity: u32,
) -> Result<(), eyre::Report> {
    let actual = world.engine.page_capacity(PageIndex::new(page)).value();
    eyre::ensure!(
        actual == capacity,
        "expected capacity {capacity}, found {actual}"
    );
    Ok(())
}

#[then("every task on page {page:u32} is dismissed")]
fn every_task_dismissed(world: &PageLifecycleWorld, page: u32) -> Result<(), eyre::Report> {
    ensure_page_statuses(world, page, TaskStatusKind::Dismissed)
}

#[then("every task on page {page:u32} is active")]
fn every_task_active(world: &PageLifecycleWorld, page: u32) -> Result<(), eyre::Report> {
    ensure_page_statuses(world, page, TaskStatusKind::Active)
}

#[then("the reader is on page {page:u32}")]
fn reader_is_on_page(world: &PageLifecycleWorld, page: u32) -> Result<(), eyre::Report> {
    let current = world.engine.current_page();
    eyre::ensure!(
        current == PageIndex::new(page),
        "expected the reader on page {page}, found page {current}"
    );
    Ok(())
}

#[then(r#"writing "{text}" warns about dismissed work"#)]
fn writing_warns(world: &PageLifecycleWorld, text: String) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.engine.dismissed_warning(&text),
        "expected a dismissal warning for {text:?}"
    );
    Ok(())
}

#[then(r#"writing "{text}" does not warn"#)]
fn writing_does_not_warn(world: &PageLifecycleWorld, text: String) -> Result<(), eyre::Report> {
    eyre::ensure!(
        !world.engine.dismissed_warning(&text),
        "unexpected dismissal warning for {text:?}"
    );
    Ok(())
}
