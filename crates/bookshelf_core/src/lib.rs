//! Core catalog engine for Bookshelf.
//! This crate is the single source of truth for record and index invariants.

pub mod config;
pub mod error;
pub mod history;
pub mod index;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{CatalogConfig, DuplicatePolicy, LoggingConfig};
pub use error::{CatalogError, CatalogResult};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::book::{
    BookField, BookRecord, BookValidationError, FieldPolicy, AUTHOR_MAX_CHARS, TITLE_MAX_CHARS,
};
pub use model::undo::{UndoEntry, UndoKind};
pub use service::catalog::{Catalog, Registered, TeardownReport, UndoOutcome};
pub use store::record_store::BookId;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
