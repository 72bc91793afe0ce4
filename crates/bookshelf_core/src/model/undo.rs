//! Undo snapshot model.

use crate::model::book::BookRecord;
use serde::{Deserialize, Serialize};

/// Mutation recorded by an undo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoKind {
    /// A record was registered; undo removes it.
    Register,
    /// A record was removed; undo registers it again.
    Remove,
}

/// Independent copy of the record fields at the time of the mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoEntry {
    pub kind: UndoKind,
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl UndoEntry {
    pub fn new(kind: UndoKind, title: &str, author: &str, year: i32) -> Self {
        Self {
            kind,
            title: title.to_string(),
            author: author.to_string(),
            year,
        }
    }

    /// Snapshot of `record` tagged with `kind`.
    pub fn snapshot(kind: UndoKind, record: &BookRecord) -> Self {
        Self::new(kind, &record.title, &record.author, record.year)
    }

    /// Rebuilds the record this entry describes.
    pub fn to_record(&self) -> BookRecord {
        BookRecord::new(self.title.as_str(), self.author.as_str(), self.year)
    }
}
