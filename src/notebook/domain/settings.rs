//! User settings and the per-page overrides the page policy consults.

use super::{FontSize, PageIndex, PageSize};
use std::collections::{BTreeMap, BTreeSet};

/// Global notebook preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    page_size: PageSize,
    font_size: FontSize,
}

impl Settings {
    /// Creates settings from validated values.
    #[must_use]
    pub const fn new(page_size: PageSize, font_size: FontSize) -> Self {
        Self {
            page_size,
            font_size,
        }
    }

    /// Returns the default capacity for newly created pages.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Returns the presentation font size.
    #[must_use]
    pub const fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub(crate) const fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
    }

    pub(crate) const fn set_font_size(&mut self, font_size: FontSize) {
        self.font_size = font_size;
    }
}

/// Capacities frozen per page and the set of pages sealed by a resize.
///
/// Entries are only ever added, overwritten for the frontier page, or
/// filtered out of the closed set; a full reset is the only way to clear
/// them wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    capacities: BTreeMap<PageIndex, PageSize>,
    closed: BTreeSet<PageIndex>,
}

impl PageLayout {
    /// Creates an empty layout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capacities: BTreeMap::new(),
            closed: BTreeSet::new(),
        }
    }

    /// Reconstructs a layout from persisted parts.
    #[must_use]
    pub const fn from_parts(
        capacities: BTreeMap<PageIndex, PageSize>,
        closed: BTreeSet<PageIndex>,
    ) -> Self {
        Self { capacities, closed }
    }

    /// Returns the capacity frozen for `page`, if one was recorded.
    #[must_use]
    pub fn frozen_capacity(&self, page: PageIndex) -> Option<PageSize> {
        self.capacities.get(&page).copied()
    }

    /// Returns `true` when `page` was sealed by a capacity reduction.
    #[must_use]
    pub fn is_closed(&self, page: PageIndex) -> bool {
        self.closed.contains(&page)
    }

    /// Returns every frozen capacity in page order.
    #[must_use]
    pub const fn capacities(&self) -> &BTreeMap<PageIndex, PageSize> {
        &self.capacities
    }

    /// Returns every closed page in ascending order.
    #[must_use]
    pub const fn closed_pages(&self) -> &BTreeSet<PageIndex> {
        &self.closed
    }

    /// Returns `true` when no overrides are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty() && self.closed.is_empty()
    }

    pub(crate) fn freeze_capacity(&mut self, page: PageIndex, capacity: PageSize) {
        self.capacities.insert(page, capacity);
    }

    pub(crate) fn close(&mut self, page: PageIndex) -> bool {
        self.closed.insert(page)
    }

    pub(crate) fn reopen(&mut self, page: PageIndex) -> bool {
        self.closed.remove(&page)
    }

    pub(crate) fn replace_capacities(&mut self, capacities: BTreeMap<PageIndex, PageSize>) {
        self.capacities = capacities;
    }

    pub(crate) fn replace_closed(&mut self, closed: BTreeSet<PageIndex>) {
        self.closed = closed;
    }
}

/// Settings and layout persisted together as one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRecord {
    /// Global preferences.
    pub settings: Settings,
    /// Per-page overrides.
    pub layout: PageLayout,
}
