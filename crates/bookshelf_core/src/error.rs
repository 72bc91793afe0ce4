//! Catalog error type.
//!
//! # Invariants
//! - Every variant is recoverable; a failed operation leaves the catalog
//!   unchanged unless its docs say otherwise.

use crate::model::book::{BookField, BookValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors reported by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No record has this exact title.
    NotFound(String),
    /// Undo was requested with an empty log.
    EmptyLog,
    /// Input exceeds a field's storage capacity.
    FieldTooLong {
        field: BookField,
        max: usize,
        actual: usize,
    },
    /// A record with this title exists and duplicates are rejected.
    DuplicateTitle(String),
    /// The record store has no free slot index left.
    StoreFull,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(title) => write!(f, "book not found: `{title}`"),
            Self::EmptyLog => write!(f, "nothing to undo"),
            Self::FieldTooLong { field, max, actual } => write!(
                f,
                "{field} is {actual} characters long; at most {max} are allowed"
            ),
            Self::DuplicateTitle(title) => write!(f, "book already registered: `{title}`"),
            Self::StoreFull => write!(f, "record store is full"),
        }
    }
}

impl Error for CatalogError {}

impl From<BookValidationError> for CatalogError {
    fn from(value: BookValidationError) -> Self {
        match value {
            BookValidationError::FieldTooLong { field, max, actual } => {
                Self::FieldTooLong { field, max, actual }
            }
        }
    }
}
