//! Catalog and logging configuration.
//!
//! # Responsibility
//! - Make duplicate-title and field-capacity handling explicit choices.
//! - Resolve logging settings for front ends.
//!
//! # Invariants
//! - `Default` values match the behavior of a catalog with no configuration:
//!   duplicates allowed, over-capacity fields rejected.

use crate::logging::default_log_level;
use crate::model::book::FieldPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "BOOKSHELF_LOG_LEVEL";
/// Environment variable holding an absolute log directory.
pub const LOG_DIR_ENV: &str = "BOOKSHELF_LOG_DIR";

/// What `register` does when the title is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep both records. Lookup and removal by title act on one of them.
    #[default]
    Allow,
    /// Fail with `CatalogError::DuplicateTitle`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub duplicate_policy: DuplicatePolicy,
    pub field_policy: FieldPolicy,
}

impl CatalogConfig {
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_field_policy(mut self, policy: FieldPolicy) -> Self {
        self.field_policy = policy;
        self
    }
}

/// Logger settings.
///
/// `log_dir = None` logs to stderr; otherwise rotating files are written to
/// that absolute directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Reads `BOOKSHELF_LOG_LEVEL` and `BOOKSHELF_LOG_DIR`.
    ///
    /// Unset or blank variables fall back to defaults. Values are validated by
    /// `init_logging`, not here.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            level: non_blank(LOG_LEVEL_ENV).unwrap_or(defaults.level),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
