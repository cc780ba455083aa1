//! Notebook engine: task lifecycle, page placement, and page advance.

use super::changes::{ChangeNotifier, StateChange};
use crate::notebook::{
    config::NotebookConfig,
    domain::{
        FontSize, ImportDocument, MalformedImportError, NotebookDomainError, NotebookSnapshot,
        PageIndex, PageLayout, PagePolicy, PageResize, PageSize, PageSummary, Settings,
        SettingsRecord, SuggestionIndex, Task, TaskId, TaskPatch, TaskStore, apply_resize,
    },
    ports::NotebookRepository,
};
use mockable::Clock;
use serde_json::Value;
use std::{collections::BTreeSet, sync::Arc};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced to engine callers. None of them change engine state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotebookError {
    /// Input failed domain validation.
    #[error(transparent)]
    Validation(#[from] NotebookDomainError),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The import payload has an unexpected shape.
    #[error(transparent)]
    MalformedImport(#[from] MalformedImportError),
}

/// Result type for engine operations.
pub type NotebookResult<T> = Result<T, NotebookError>;

/// The page being viewed and whether the user acted on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    current: PageIndex,
    action_taken: bool,
}

impl PageCursor {
    /// Returns the page being viewed.
    #[must_use]
    pub const fn current(&self) -> PageIndex {
        self.current
    }

    /// Returns `true` once a task was completed or the page was fired since
    /// arriving on it.
    #[must_use]
    pub const fn action_taken(&self) -> bool {
        self.action_taken
    }

    const fn at(current: PageIndex) -> Self {
        Self {
            current,
            action_taken: false,
        }
    }
}

/// Single owner of the notebook state.
///
/// All mutation goes through `&mut self` methods, so the borrow checker
/// enforces one writer at a time. Each committed mutation is published to
/// the [`ChangeNotifier`]; the engine never waits on persistence.
pub struct NotebookEngine<C>
where
    C: Clock + Send + Sync,
{
    store: TaskStore,
    settings: Settings,
    layout: PageLayout,
    cursor: PageCursor,
    config: NotebookConfig,
    clock: Arc<C>,
    notifier: ChangeNotifier,
}

impl<C> NotebookEngine<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty notebook.
    #[must_use]
    pub fn new(config: NotebookConfig, clock: Arc<C>) -> Self {
        Self {
            store: TaskStore::new(),
            settings: config.default_settings(),
            layout: PageLayout::new(),
            cursor: PageCursor::default(),
            config,
            clock,
            notifier: ChangeNotifier::disabled(),
        }
    }

    /// Attaches the notifier that receives committed changes.
    #[must_use]
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Creates a notebook hydrated from `repository`.
    ///
    /// A repository failure or an unreadable document is logged and yields
    /// an empty notebook; loading never fails.
    pub async fn load<R>(repository: &R, config: NotebookConfig, clock: Arc<C>) -> Self
    where
        R: NotebookRepository + ?Sized,
    {
        let mut engine = Self::new(config, clock);
        match repository.load().await {
            Ok(Some(snapshot)) => {
                if let Err(err) = engine.restore(snapshot) {
                    warn!(error = %err, "stored notebook is unreadable, starting empty");
                }
            }
            Ok(None) => debug!("no stored notebook, starting empty"),
            Err(err) => warn!(error = %err, "failed to load notebook, starting empty"),
        }
        engine
    }

    // ----- queries -----

    /// Returns the task store.
    #[must_use]
    pub const fn tasks(&self) -> &TaskStore {
        &self.store
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    /// Returns the tasks written on `page`, in store order.
    #[must_use]
    pub fn page_tasks(&self, page: PageIndex) -> Vec<&Task> {
        self.store.on_page(page).collect()
    }

    /// Returns the global settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the per-page overrides.
    #[must_use]
    pub const fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Returns the configuration the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &NotebookConfig {
        &self.config
    }

    /// Returns the page cursor.
    #[must_use]
    pub const fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Returns the page being viewed.
    #[must_use]
    pub const fn current_page(&self) -> PageIndex {
        self.cursor.current
    }

    /// Returns `true` once the user acted on the current page.
    #[must_use]
    pub const fn action_taken(&self) -> bool {
        self.cursor.action_taken
    }

    /// Returns a policy view over the current state.
    #[must_use]
    pub const fn policy(&self) -> PagePolicy<'_> {
        PagePolicy::new(&self.store, &self.settings, &self.layout)
    }

    /// Returns the frontier page index, `0` for an empty notebook.
    #[must_use]
    pub fn max_page_index(&self) -> PageIndex {
        self.policy().max_page_index()
    }

    /// Returns the lowest page holding an active task, `0` when none does.
    #[must_use]
    pub fn first_active_page_index(&self) -> PageIndex {
        self.policy().first_active_page().unwrap_or(PageIndex::FIRST)
    }

    /// Returns the last page worth visiting, which is the frontier page.
    #[must_use]
    pub fn last_active_page_index(&self) -> PageIndex {
        self.max_page_index()
    }

    /// Returns `true` when `page` reached its capacity.
    #[must_use]
    pub fn is_page_full(&self, page: PageIndex) -> bool {
        self.policy().is_full(page)
    }

    /// Returns `true` when a resize sealed `page`.
    #[must_use]
    pub fn is_page_closed(&self, page: PageIndex) -> bool {
        self.policy().is_closed(page)
    }

    /// Returns the resolved capacity of `page`.
    #[must_use]
    pub fn page_capacity(&self, page: PageIndex) -> PageSize {
        self.policy().capacity(page)
    }

    /// Describes `page`.
    #[must_use]
    pub fn page_summary(&self, page: PageIndex) -> PageSummary {
        self.policy().summary(page)
    }

    /// Returns the page the next added task would be written on.
    #[must_use]
    pub fn placement_page(&self) -> PageIndex {
        self.policy().placement_page()
    }

    /// Returns recall suggestions for `query`.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        SuggestionIndex::new(&self.store).suggestions(query)
    }

    /// Returns `true` when `query` repeats a dismissed task verbatim.
    #[must_use]
    pub fn dismissed_warning(&self, query: &str) -> bool {
        SuggestionIndex::new(&self.store).dismissed_warning(query)
    }

    /// Captures the whole notebook for export.
    #[must_use]
    pub fn export_snapshot(&self) -> NotebookSnapshot {
        NotebookSnapshot::capture(&self.store, &self.settings_record(), Some(self.clock.utc()))
    }

    fn settings_record(&self) -> SettingsRecord {
        SettingsRecord {
            settings: self.settings,
            layout: self.layout.clone(),
        }
    }

    // ----- task lifecycle -----

    /// Writes a new active task on the placement page and moves the cursor
    /// there.
    ///
    /// Opening a page freezes its capacity at the current page size.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Validation`] when `text` is blank.
    pub fn add_task(
        &mut self,
        text: impl Into<String>,
        details: Option<String>,
    ) -> NotebookResult<Task> {
        let target = self.placement_page();
        let task = Task::new(text, details, target, &*self.clock)?;

        let opens_page = target > self.max_page_index();
        let freezes_capacity = opens_page || self.layout.frozen_capacity(target).is_none();
        if freezes_capacity {
            self.layout
                .freeze_capacity(target, self.settings.page_size());
        }

        debug!(task_id = %task.id(), page = %target, "task added");
        self.store.push(task.clone());
        self.notifier
            .notify(StateChange::TasksUpserted(vec![task.clone()]));
        if freezes_capacity {
            self.notifier
                .notify(StateChange::SettingsChanged(self.settings_record()));
        }
        self.move_cursor(target);
        Ok(task)
    }

    /// Completes an active task and marks the current page as acted on.
    ///
    /// Completing a task that is already completed or dismissed leaves the
    /// task unchanged but still counts as acting on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::NotFound`] when no task has `id`.
    pub fn complete_task(&mut self, id: &TaskId) -> NotebookResult<Task> {
        let task = self
            .store
            .get_mut(id)
            .ok_or_else(|| NotebookError::NotFound(id.clone()))?;
        self.cursor.action_taken = true;
        if !task.complete(&*self.clock) {
            debug!(task_id = %id, "task already finished, completion ignored");
            return Ok(task.clone());
        }
        let completed = task.clone();
        debug!(task_id = %id, page = %completed.page_index(), "task completed");
        self.notifier
            .notify(StateChange::TasksUpserted(vec![completed.clone()]));
        Ok(completed)
    }

    /// Fires `page`: dismisses every active task on it.
    ///
    /// Finished tasks are untouched, so a second call is a no-op. Firing the
    /// current page counts as acting on it. Returns the tasks dismissed by
    /// this call.
    pub fn dismiss_page_tasks(&mut self, page: PageIndex) -> Vec<Task> {
        let clock = Arc::clone(&self.clock);
        let dismissed: Vec<Task> = self
            .store
            .on_page_mut(page)
            .filter_map(|task| task.dismiss(&*clock).then(|| task.clone()))
            .collect();
        if page == self.cursor.current {
            self.cursor.action_taken = true;
        }
        if dismissed.is_empty() {
            debug!(page = %page, "no active tasks to dismiss");
            return dismissed;
        }
        info!(page = %page, count = dismissed.len(), "page fired");
        self.notifier
            .notify(StateChange::TasksUpserted(dismissed.clone()));
        dismissed
    }

    /// Edits a task's text or details in any status.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::NotFound`] when no task has `id`, or
    /// [`NotebookError::Validation`] when the patch sets a blank text.
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> NotebookResult<Task> {
        let task = self
            .store
            .get_mut(id)
            .ok_or_else(|| NotebookError::NotFound(id.clone()))?;
        task.apply_patch(patch, &*self.clock)?;
        let updated = task.clone();
        debug!(task_id = %id, "task updated");
        self.notifier
            .notify(StateChange::TasksUpserted(vec![updated.clone()]));
        Ok(updated)
    }

    /// Hard-deletes a task in any status and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::NotFound`] when no task has `id`.
    pub fn delete_task(&mut self, id: &TaskId) -> NotebookResult<Task> {
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| NotebookError::NotFound(id.clone()))?;
        debug!(task_id = %id, "task deleted");
        self.notifier.notify(StateChange::TaskDeleted(id.clone()));
        Ok(removed)
    }

    // ----- paging -----

    /// Records that the user acted on the current page.
    pub const fn mark_action_taken(&mut self) {
        self.cursor.action_taken = true;
    }

    /// Leaves the current page and returns the page moved to.
    ///
    /// Leaving any page other than the frontier without acting on it fires
    /// that page first, then the cursor steps to the next page. From the
    /// frontier, the cursor wraps to the lowest page still holding an
    /// active task, or stays put when there is none.
    pub fn advance_page(&mut self) -> PageIndex {
        let frontier = self.max_page_index();
        let leaving = self.cursor.current;
        let from_frontier = leaving == frontier;

        if !self.cursor.action_taken && !from_frontier {
            info!(page = %leaving, "page left without action, dismissing");
            self.dismiss_page_tasks(leaving);
        }

        let next = if from_frontier {
            self.policy().first_active_page().unwrap_or(frontier)
        } else {
            leaving.next()
        };
        self.cursor = PageCursor::at(next);
        debug!(from = %leaving, to = %next, "page advanced");
        next
    }

    /// Jumps straight to `page` without any dismissal.
    pub fn go_to_page(&mut self, page: PageIndex) {
        self.move_cursor(page);
    }

    fn move_cursor(&mut self, page: PageIndex) {
        if page != self.cursor.current {
            self.cursor = PageCursor::at(page);
        }
    }

    // ----- settings -----

    /// Changes the page size for future pages and reconciles the frontier
    /// page: it is sealed when it already holds more items than `size`,
    /// otherwise it adopts `size` and reopens.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Validation`] when `size` is zero.
    pub fn set_page_size(&mut self, size: u32) -> NotebookResult<PageResize> {
        let page_size = PageSize::new(size)?;
        self.settings.set_page_size(page_size);
        let resize = self.policy().plan_resize(page_size);
        apply_resize(&mut self.layout, resize, page_size);
        match resize {
            PageResize::Closed { page, item_count } => {
                info!(page = %page, item_count, page_size = size, "frontier page closed");
            }
            PageResize::Adopted { page, reopened } => {
                info!(page = %page, reopened, page_size = size, "frontier page resized");
            }
        }
        self.notifier
            .notify(StateChange::SettingsChanged(self.settings_record()));
        Ok(resize)
    }

    /// Stores the presentation font size.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Validation`] when `size` is zero.
    pub fn set_font_size(&mut self, size: u32) -> NotebookResult<()> {
        self.settings.set_font_size(FontSize::new(size)?);
        self.notifier
            .notify(StateChange::SettingsChanged(self.settings_record()));
        Ok(())
    }

    /// Clears every task, setting, and page override back to defaults.
    pub fn reset_all(&mut self) {
        self.store.clear();
        self.settings = self.config.default_settings();
        self.layout = PageLayout::new();
        self.cursor = PageCursor::default();
        info!("notebook reset");
        self.notifier.notify(StateChange::Cleared);
    }

    // ----- import / restore / sync -----

    /// Imports a JSON payload, applying only the fields present.
    ///
    /// The whole payload is validated before anything changes. Afterwards
    /// the cursor is back on the first page.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::MalformedImport`] when the payload is not an
    /// object or a field has an unexpected shape.
    pub fn import_value(&mut self, payload: &Value) -> NotebookResult<()> {
        let document = ImportDocument::from_value(payload)?;
        self.apply_document(document);
        self.cursor = PageCursor::default();
        info!(tasks = self.store.len(), "notebook imported");
        self.notifier.notify(StateChange::Replaced(NotebookSnapshot::capture(
            &self.store,
            &self.settings_record(),
            None,
        )));
        Ok(())
    }

    /// Hydrates the engine from a stored snapshot.
    ///
    /// Data saved before per-page capacities existed gets the legacy
    /// capacity frozen on every used page. The cursor lands on the first
    /// page with active work. Nothing is published.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::MalformedImport`] when the snapshot holds an
    /// invalid record; state is left unchanged.
    pub fn restore(&mut self, snapshot: NotebookSnapshot) -> NotebookResult<()> {
        let document = snapshot.into_document()?;
        self.apply_document(document);
        if !self.store.is_empty() && self.layout.capacities().is_empty() {
            let legacy = self.config.legacy_page_capacity();
            let used: BTreeSet<PageIndex> = self.store.iter().map(Task::page_index).collect();
            for page in used {
                self.layout.freeze_capacity(page, legacy);
            }
            info!(capacity = legacy.value(), "migrated legacy page capacities");
        }
        self.cursor = PageCursor::at(self.first_active_page_index());
        debug!(tasks = self.store.len(), "notebook restored");
        Ok(())
    }

    /// Merges tasks received from a remote replica, last write wins per task.
    ///
    /// Returns the number of tasks inserted or replaced. Nothing is
    /// published, since the data already lives remotely.
    pub fn merge_remote_tasks(&mut self, remote: Vec<Task>) -> usize {
        let changed = self.store.merge_last_write_wins(remote);
        debug!(changed, "remote tasks merged");
        changed
    }

    fn apply_document(&mut self, document: ImportDocument) {
        let ImportDocument {
            tasks,
            page_size,
            font_size,
            page_capacities,
            closed_pages,
        } = document;
        if let Some(imported) = tasks {
            self.store = TaskStore::from_tasks(imported);
        }
        if let Some(size) = page_size {
            self.settings.set_page_size(size);
        }
        if let Some(size) = font_size {
            self.settings.set_font_size(size);
        }
        if let Some(capacities) = page_capacities {
            self.layout.replace_capacities(capacities);
        }
        if let Some(closed) = closed_pages {
            self.layout.replace_closed(closed);
        }
    }
}
