//! Ordered task collection.

use super::{PageIndex, Task, TaskId};

/// Tasks in insertion order.
///
/// The store knows nothing about pages beyond each task's page index; page
/// fullness and placement live in the page policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Creates a store holding `tasks` in the given order.
    #[must_use]
    pub const fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Returns `true` when the store holds no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the number of stored tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Iterates over tasks in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Returns all tasks as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Iterates over tasks written on `page`, in store order.
    pub fn on_page(&self, page: PageIndex) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |task| task.page_index() == page)
    }

    /// Counts every task ever written on `page`, regardless of status.
    #[must_use]
    pub fn item_count(&self, page: PageIndex) -> usize {
        self.on_page(page).count()
    }

    /// Returns `true` when `page` holds at least one active task.
    #[must_use]
    pub fn has_active(&self, page: PageIndex) -> bool {
        self.on_page(page).any(Task::is_active)
    }

    /// Returns the greatest page index in use, or `None` when empty.
    #[must_use]
    pub fn max_page_index(&self) -> Option<PageIndex> {
        self.tasks.iter().map(Task::page_index).max()
    }

    pub(crate) fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    pub(crate) fn on_page_mut(&mut self, page: PageIndex) -> impl Iterator<Item = &mut Task> {
        self.tasks
            .iter_mut()
            .filter(move |task| task.page_index() == page)
    }

    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub(crate) fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id() == id)?;
        Some(self.tasks.remove(position))
    }

    pub(crate) fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Merges remote tasks using last-write-wins on `updated_at`.
    ///
    /// A remote task replaces the local one only when strictly newer; unknown
    /// tasks are appended in the given order. Returns the number of tasks
    /// inserted or replaced.
    pub(crate) fn merge_last_write_wins(&mut self, remote: impl IntoIterator<Item = Task>) -> usize {
        let mut changed = 0;
        for incoming in remote {
            match self.get_mut(incoming.id()) {
                Some(existing) if incoming.updated_at() > existing.updated_at() => {
                    *existing = incoming;
                    changed += 1;
                }
                Some(_) => {}
                None => {
                    self.tasks.push(incoming);
                    changed += 1;
                }
            }
        }
        changed
    }
}

impl<'a> IntoIterator for &'a TaskStore {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
