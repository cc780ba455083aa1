//! Error types for notebook domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating notebook domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotebookDomainError {
    /// The task text is empty after trimming.
    #[error("task text must not be empty")]
    EmptyTaskText,

    /// The page size is not a positive integer.
    #[error("invalid page size {0}, expected a positive integer")]
    InvalidPageSize(u32),

    /// The font size is not a positive integer.
    #[error("invalid font size {0}, expected a positive integer")]
    InvalidFontSize(u32),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned when an import payload does not have the expected shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed import: {reason}")]
pub struct MalformedImportError {
    reason: String,
}

impl MalformedImportError {
    /// Creates an import error with a human-readable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason the payload was rejected.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
