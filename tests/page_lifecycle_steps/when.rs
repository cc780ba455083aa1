//! When steps for page lifecycle BDD scenarios.

use super::world::PageLifecycleWorld;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"a task "{text}" is added"#)]
fn task_is_added(world: &mut PageLifecycleWorld, text: String) -> Result<(), eyre::Report> {
    let task = world
        .engine
        .add_task(text, None)
        .wrap_err("add task in scenario")?;
    world.last_task = Some(task);
    Ok(())
}

#[when("the page size is set to {size:u32}")]
fn page_size_is_set(world: &mut PageLifecycleWorld, size: u32) -> Result<(), eyre::Report> {
    world.engine.set_page_size(size)?;
    Ok(())
}

#[when("the reader advances")]
fn reader_advances(world: &mut PageLifecycleWorld) {
    world.engine.advance_page();
}
