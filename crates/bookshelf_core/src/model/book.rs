//! Book record model and field-capacity policy.
//!
//! # Responsibility
//! - Define the canonical record stored in the catalog.
//! - Normalize raw input against fixed storage capacities.
//!
//! # Invariants
//! - `title` holds at most `TITLE_MAX_CHARS` characters once normalized.
//! - `author` holds at most `AUTHOR_MAX_CHARS` characters once normalized.
//! - Record content is never rewritten by index maintenance.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage capacity of a title, in characters.
pub const TITLE_MAX_CHARS: usize = 99;
/// Storage capacity of an author name, in characters.
pub const AUTHOR_MAX_CHARS: usize = 49;

/// Canonical catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRecord {
    /// Lookup key for the sorted index. Uniqueness is a catalog policy, not a
    /// model rule.
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// Capacity-limited text fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookField {
    Title,
    Author,
}

impl BookField {
    /// Maximum number of characters the field can store.
    pub fn max_chars(self) -> usize {
        match self {
            Self::Title => TITLE_MAX_CHARS,
            Self::Author => AUTHOR_MAX_CHARS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
        }
    }
}

impl Display for BookField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How over-capacity input is handled when a record is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
    /// Fail with `BookValidationError::FieldTooLong`.
    #[default]
    Reject,
    /// Keep the leading characters that fit and report the field.
    Truncate,
}

/// Validation error for record input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    FieldTooLong {
        field: BookField,
        max: usize,
        actual: usize,
    },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldTooLong { field, max, actual } => write!(
                f,
                "{field} is {actual} characters long; at most {max} are allowed"
            ),
        }
    }
}

impl Error for BookValidationError {}

/// Record built from raw input, plus the fields that had to be truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBook {
    pub record: BookRecord,
    pub truncated: Vec<BookField>,
}

impl BookRecord {
    /// Creates a record without capacity checks.
    ///
    /// Used for snapshots that were already normalized once.
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Builds a record from raw input under `policy`.
    ///
    /// # Errors
    /// - `FieldTooLong` for the first over-capacity field when `policy` is
    ///   `FieldPolicy::Reject` (title is checked before author).
    pub fn normalized(
        title: &str,
        author: &str,
        year: i32,
        policy: FieldPolicy,
    ) -> Result<NormalizedBook, BookValidationError> {
        let mut truncated = Vec::new();
        let title = fit_field(BookField::Title, title, policy, &mut truncated)?;
        let author = fit_field(BookField::Author, author, policy, &mut truncated)?;
        Ok(NormalizedBook {
            record: Self {
                title,
                author,
                year,
            },
            truncated,
        })
    }
}

fn fit_field(
    field: BookField,
    value: &str,
    policy: FieldPolicy,
    truncated: &mut Vec<BookField>,
) -> Result<String, BookValidationError> {
    match (check_len(field, value), policy) {
        (Ok(()), _) => Ok(value.to_string()),
        (Err(err), FieldPolicy::Reject) => Err(err),
        (Err(_), FieldPolicy::Truncate) => {
            truncated.push(field);
            Ok(value.chars().take(field.max_chars()).collect())
        }
    }
}

fn check_len(field: BookField, value: &str) -> Result<(), BookValidationError> {
    let actual = value.chars().count();
    let max = field.max_chars();
    if actual > max {
        return Err(BookValidationError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BookField, BookRecord, BookValidationError, FieldPolicy, TITLE_MAX_CHARS};

    #[test]
    fn normalized_keeps_input_within_capacity() {
        let book = BookRecord::normalized("Dune", "Herbert", 1965, FieldPolicy::Reject)
            .expect("short fields should pass");
        assert_eq!(book.record, BookRecord::new("Dune", "Herbert", 1965));
        assert!(book.truncated.is_empty());
    }

    #[test]
    fn reject_policy_reports_field_and_lengths() {
        let title = "x".repeat(TITLE_MAX_CHARS + 1);
        let err = BookRecord::normalized(&title, "a", 1, FieldPolicy::Reject)
            .expect_err("long title must be rejected");
        assert_eq!(
            err,
            BookValidationError::FieldTooLong {
                field: BookField::Title,
                max: 99,
                actual: 100,
            }
        );
    }

    #[test]
    fn truncate_policy_counts_characters_not_bytes() {
        let author = "é".repeat(60);
        let book = BookRecord::normalized("t", &author, 1, FieldPolicy::Truncate)
            .expect("truncate policy never fails");
        assert_eq!(book.record.author.chars().count(), 49);
        assert_eq!(book.truncated, vec![BookField::Author]);
        assert_eq!(book.record.author.len(), 49 * 'é'.len_utf8());
    }

    #[test]
    fn boundary_length_is_accepted() {
        let title = "t".repeat(TITLE_MAX_CHARS);
        assert!(BookRecord::normalized(&title, "a", 1, FieldPolicy::Reject).is_ok());
    }
}
