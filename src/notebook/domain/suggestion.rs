//! Recall suggestions mined from finished tasks.

use super::{TaskStatusKind, TaskStore};

/// Queries shorter than this many characters yield no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

/// Upper bound on suggestions returned for one query.
pub const MAX_SUGGESTIONS: usize = 5;

/// Read-only query over completed and dismissed task text.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionIndex<'a> {
    store: &'a TaskStore,
}

impl<'a> SuggestionIndex<'a> {
    /// Creates an index over `store`.
    #[must_use]
    pub const fn new(store: &'a TaskStore) -> Self {
        Self { store }
    }

    /// Returns up to [`MAX_SUGGESTIONS`] distinct texts of finished tasks
    /// containing `query`, ignoring case.
    ///
    /// Results keep store order: the first task seen with a given text wins.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        let mut matches: Vec<String> = Vec::new();
        let candidates = self
            .store
            .iter()
            .filter(|task| task.status().is_terminal())
            .filter(|task| task.text().to_lowercase().contains(&needle));
        for task in candidates {
            if matches.len() == MAX_SUGGESTIONS {
                break;
            }
            if !matches.iter().any(|seen| seen == task.text()) {
                matches.push(task.text().to_owned());
            }
        }
        matches
    }

    /// Returns `true` when `query` matches the text of a dismissed task
    /// exactly, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn dismissed_warning(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        self.store
            .iter()
            .filter(|task| task.status().kind() == TaskStatusKind::Dismissed)
            .any(|task| task.text().trim().to_lowercase() == needle)
    }
}
