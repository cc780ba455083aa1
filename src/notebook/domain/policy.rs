//! Page policy: capacity, closure, and placement rules.
//!
//! Pages are not stored anywhere. Every answer here is computed from the
//! task store grouped by page index plus the settings overrides, so page
//! state cannot drift from the tasks it describes.

use super::{PageIndex, PageLayout, PageSize, Settings, TaskStore};

/// Outcome of reconciling the frontier page with a new page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageResize {
    /// The frontier page holds more items than the new size and is sealed.
    Closed {
        /// The sealed page.
        page: PageIndex,
        /// Items already written on the page.
        item_count: usize,
    },
    /// The frontier page adopts the new size and is open again.
    Adopted {
        /// The resized page.
        page: PageIndex,
        /// `true` when the page had been closed before this resize.
        reopened: bool,
    },
}

/// Derived description of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// The page described.
    pub index: PageIndex,
    /// Resolved capacity.
    pub capacity: PageSize,
    /// Every task ever written on the page.
    pub item_count: usize,
    /// Tasks still open on the page.
    pub active_count: usize,
    /// Whether a resize sealed the page.
    pub closed: bool,
    /// Whether the item count reached the capacity.
    pub full: bool,
}

/// Read-only policy view over the notebook state.
#[derive(Debug, Clone, Copy)]
pub struct PagePolicy<'a> {
    store: &'a TaskStore,
    settings: &'a Settings,
    layout: &'a PageLayout,
}

impl<'a> PagePolicy<'a> {
    /// Creates a policy view.
    #[must_use]
    pub const fn new(store: &'a TaskStore, settings: &'a Settings, layout: &'a PageLayout) -> Self {
        Self {
            store,
            settings,
            layout,
        }
    }

    /// Resolves the capacity of `page`: the frozen override when present,
    /// otherwise the global page size.
    #[must_use]
    pub fn capacity(&self, page: PageIndex) -> PageSize {
        self.layout
            .frozen_capacity(page)
            .unwrap_or_else(|| self.settings.page_size())
    }

    /// Counts every task ever written on `page`.
    #[must_use]
    pub fn item_count(&self, page: PageIndex) -> usize {
        self.store.item_count(page)
    }

    /// Returns `true` when `page` holds as many items as its capacity.
    ///
    /// Completed and dismissed tasks still occupy their slot.
    #[must_use]
    pub fn is_full(&self, page: PageIndex) -> bool {
        let capacity = usize::try_from(self.capacity(page).value()).unwrap_or(usize::MAX);
        self.item_count(page) >= capacity
    }

    /// Returns `true` when a resize sealed `page`.
    #[must_use]
    pub fn is_closed(&self, page: PageIndex) -> bool {
        self.layout.is_closed(page)
    }

    /// Returns the frontier page: the greatest page index in use, or the
    /// first page of an empty notebook.
    #[must_use]
    pub fn max_page_index(&self) -> PageIndex {
        self.store.max_page_index().unwrap_or(PageIndex::FIRST)
    }

    /// Chooses the page a new task is written on.
    ///
    /// The frontier page is reused while it is neither closed nor full;
    /// otherwise a fresh page after it is opened.
    #[must_use]
    pub fn placement_page(&self) -> PageIndex {
        let Some(last) = self.store.max_page_index() else {
            return PageIndex::FIRST;
        };
        if self.is_closed(last) || self.is_full(last) {
            last.next()
        } else {
            last
        }
    }

    /// Returns the lowest page holding an active task, if any.
    #[must_use]
    pub fn first_active_page(&self) -> Option<PageIndex> {
        let last = self.max_page_index().value();
        (0..=last)
            .map(PageIndex::new)
            .find(|page| self.store.has_active(*page))
    }

    /// Describes `page`.
    #[must_use]
    pub fn summary(&self, page: PageIndex) -> PageSummary {
        PageSummary {
            index: page,
            capacity: self.capacity(page),
            item_count: self.item_count(page),
            active_count: self.store.on_page(page).filter(|task| task.is_active()).count(),
            closed: self.is_closed(page),
            full: self.is_full(page),
        }
    }

    /// Decides how the frontier page reacts to a new global page size.
    ///
    /// Pages other than the frontier keep whatever capacity they froze.
    #[must_use]
    pub fn plan_resize(&self, new_size: PageSize) -> PageResize {
        let page = self.max_page_index();
        let item_count = self.item_count(page);
        let fits = usize::try_from(new_size.value()).map_or(true, |size| size >= item_count);
        if fits {
            PageResize::Adopted {
                page,
                reopened: self.is_closed(page),
            }
        } else {
            PageResize::Closed { page, item_count }
        }
    }
}

/// Applies a planned resize to the layout.
pub(crate) fn apply_resize(layout: &mut PageLayout, resize: PageResize, new_size: PageSize) {
    match resize {
        PageResize::Closed { page, .. } => {
            layout.close(page);
        }
        PageResize::Adopted { page, .. } => {
            layout.freeze_capacity(page, new_size);
            layout.reopen(page);
        }
    }
}
