//! Engine and persistence configuration.
//!
//! Configuration is a JSON document; every field is optional and falls back
//! to the defaults below:
//!
//! ```json
//! {
//!   "page_size": 5,
//!   "font_size": 18,
//!   "legacy_page_capacity": 5,
//!   "persistence": { "max_attempts": 3, "retry_backoff_ms": 200 }
//! }
//! ```

use super::domain::{FontSize, NotebookDomainError, PageSize, Settings};
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration '{path}': {source}")]
    Read {
        /// File name inside the configuration directory.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for this schema.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A size value failed domain validation.
    #[error(transparent)]
    Invalid(#[from] NotebookDomainError),

    /// The persistence retry budget is zero.
    #[error("persistence max_attempts must be at least 1")]
    ZeroAttempts,
}

/// Defaults for a notebook engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotebookConfig {
    page_size: PageSize,
    font_size: FontSize,
    legacy_page_capacity: PageSize,
    persistence: PersistenceConfig,
}

/// Retry policy for the persistence worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    max_attempts: u32,
    retry_backoff: Duration,
}

impl PersistenceConfig {
    /// Creates a retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroAttempts`] when `max_attempts` is zero.
    pub const fn new(max_attempts: u32, retry_backoff: Duration) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(Self {
            max_attempts,
            retry_backoff,
        })
    }

    /// Returns how many times a change is attempted before it is dropped.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the base delay between attempts; attempt `n` waits `n` times
    /// this long.
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::DEFAULT,
            font_size: FontSize::DEFAULT,
            legacy_page_capacity: PageSize::DEFAULT,
            persistence: PersistenceConfig::default(),
        }
    }
}

impl NotebookConfig {
    /// Returns the default page size used at start-up and after a reset.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Returns the default font size used at start-up and after a reset.
    #[must_use]
    pub const fn font_size(&self) -> FontSize {
        self.font_size
    }

    /// Returns the capacity assigned to pages restored from data that
    /// predates per-page capacities.
    #[must_use]
    pub const fn legacy_page_capacity(&self) -> PageSize {
        self.legacy_page_capacity
    }

    /// Returns the persistence retry policy.
    #[must_use]
    pub const fn persistence(&self) -> PersistenceConfig {
        self.persistence
    }

    /// Returns the settings a fresh notebook starts with.
    #[must_use]
    pub const fn default_settings(&self) -> Settings {
        Settings::new(self.page_size, self.font_size)
    }

    /// Overrides the default page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Overrides the persistence retry policy.
    #[must_use]
    pub const fn with_persistence(mut self, persistence: PersistenceConfig) -> Self {
        self.persistence = persistence;
        self
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is malformed or holds a
    /// zero size or retry budget.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let document: ConfigDocument = serde_json::from_str(raw)?;
        document.try_into()
    }

    /// Reads and parses `file` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`Self::from_json_str`].
    pub fn load(dir: &Dir, file: &str) -> Result<Self, ConfigError> {
        let raw = dir.read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_owned(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigDocument {
    page_size: Option<u32>,
    font_size: Option<u32>,
    legacy_page_capacity: Option<u32>,
    persistence: Option<PersistenceDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PersistenceDocument {
    max_attempts: Option<u32>,
    retry_backoff_ms: Option<u64>,
}

impl TryFrom<ConfigDocument> for NotebookConfig {
    type Error = ConfigError;

    fn try_from(document: ConfigDocument) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let persistence = document
            .persistence
            .map(|raw| {
                PersistenceConfig::new(
                    raw.max_attempts
                        .unwrap_or(defaults.persistence.max_attempts),
                    raw.retry_backoff_ms
                        .map_or(defaults.persistence.retry_backoff, Duration::from_millis),
                )
            })
            .transpose()?
            .unwrap_or(defaults.persistence);
        Ok(Self {
            page_size: document
                .page_size
                .map_or(Ok(defaults.page_size), PageSize::new)?,
            font_size: document
                .font_size
                .map_or(Ok(defaults.font_size), FontSize::new)?,
            legacy_page_capacity: document
                .legacy_page_capacity
                .map_or(Ok(defaults.legacy_page_capacity), PageSize::new)?,
            persistence,
        })
    }
}
