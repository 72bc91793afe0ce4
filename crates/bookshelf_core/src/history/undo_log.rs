//! Stack of undo snapshots.

use crate::error::{CatalogError, CatalogResult};
use crate::model::undo::{UndoEntry, UndoKind};

#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the fields into a new top entry.
    pub fn push(&mut self, kind: UndoKind, title: &str, author: &str, year: i32) {
        self.entries.push(UndoEntry::new(kind, title, author, year));
    }

    /// Removes and returns the top entry.
    ///
    /// # Errors
    /// - `CatalogError::EmptyLog` when there is nothing to undo.
    pub fn pop(&mut self) -> CatalogResult<UndoEntry> {
        self.entries.pop().ok_or(CatalogError::EmptyLog)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let freed = self.entries.len();
        self.entries.clear();
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::UndoLog;
    use crate::error::CatalogError;
    use crate::model::undo::UndoKind;

    #[test]
    fn pop_returns_entries_last_in_first_out() {
        let mut log = UndoLog::new();
        log.push(UndoKind::Register, "a", "x", 1);
        log.push(UndoKind::Remove, "b", "y", 2);
        assert_eq!(log.depth(), 2);

        let top = log.pop().expect("log has two entries");
        assert_eq!(top.kind, UndoKind::Remove);
        assert_eq!(top.title, "b");
        assert_eq!(log.pop().expect("one entry left").title, "a");
        assert!(log.is_empty());
    }

    #[test]
    fn pop_on_empty_log_fails() {
        let mut log = UndoLog::new();
        assert_eq!(log.pop(), Err(CatalogError::EmptyLog));
    }

    #[test]
    fn clear_counts_entries() {
        let mut log = UndoLog::new();
        log.push(UndoKind::Register, "a", "x", 1);
        log.push(UndoKind::Register, "b", "x", 1);
        assert_eq!(log.clear(), 2);
        assert_eq!(log.depth(), 0);
    }
}
