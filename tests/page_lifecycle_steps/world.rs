//! Shared world state for page lifecycle BDD scenarios.

use autofocus::notebook::{config::NotebookConfig, domain::Task, services::NotebookEngine};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Engine type used by the BDD world.
pub type TestEngine = NotebookEngine<DefaultClock>;

/// Scenario world for page lifecycle behaviour tests.
pub struct PageLifecycleWorld {
    pub engine: TestEngine,
    pub last_task: Option<Task>,
}

impl PageLifecycleWorld {
    /// Creates a world around an empty notebook.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: NotebookEngine::new(NotebookConfig::default(), Arc::new(DefaultClock)),
            last_task: None,
        }
    }
}

impl Default for PageLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PageLifecycleWorld {
    PageLifecycleWorld::default()
}
