//! Given steps for page lifecycle BDD scenarios.

use super::world::PageLifecycleWorld;
use autofocus::notebook::domain::PageIndex;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("a notebook with page size {size:u32}")]
fn notebook_with_page_size(world: &mut PageLifecycleWorld, size: u32) -> Result<(), eyre::Report> {
    world
        .engine
        .set_page_size(size)
        .wrap_err("set page size for scenario")?;
    Ok(())
}

#[given("{count:u32} tasks have been added")]
fn tasks_have_been_added(world: &mut PageLifecycleWorld, count: u32) -> Result<(), eyre::Report> {
    for n in 0..count {
        world
            .engine
            .add_task(format!("Errand {n}"), None)
            .wrap_err("add task in scenario setup")?;
    }
    Ok(())
}

#[given("{count:u32} tasks on page {page:u32} have been completed")]
fn tasks_on_page_completed(
    world: &mut PageLifecycleWorld,
    count: u32,
    page: u32,
) -> Result<(), eyre::Report> {
    let ids: Vec<_> = world
        .engine
        .page_tasks(PageIndex::new(page))
        .into_iter()
        .map(|task| task.id().clone())
        .take(usize::try_from(count)?)
        .collect();
    eyre::ensure!(
        u32::try_from(ids.len())? == count,
        "page {page} holds fewer than {count} tasks"
    );
    for id in ids {
        world.engine.complete_task(&id)?;
    }
    Ok(())
}

#[given("every page has been fired")]
fn every_page_fired(world: &mut PageLifecycleWorld) {
    for page in 0..=world.engine.max_page_index().value() {
        world.engine.dismiss_page_tasks(PageIndex::new(page));
    }
}

#[given("the reader is on page {page:u32}")]
fn reader_on_page(world: &mut PageLifecycleWorld, page: u32) {
    world.engine.go_to_page(PageIndex::new(page));
}

#[given(r#"a task "{text}" was dismissed"#)]
fn task_was_dismissed(world: &mut PageLifecycleWorld, text: String) -> Result<(), eyre::Report> {
    let task = world.engine.add_task(text, None)?;
    world.engine.dismiss_page_tasks(task.page_index());
    Ok(())
}
