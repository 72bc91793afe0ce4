//! Catalog façade over the record store, both indexes and the undo log.
//!
//! # Responsibility
//! - Keep the sorted index and the recency list in step for every mutation.
//! - Record undo snapshots and replay their inverse.
//!
//! # Invariants
//! - A record is live in the store iff its handle is in the recency list iff
//!   its handle is in the sorted index.
//! - `remove` detaches the same handle from both indexes, so duplicates can't
//!   desynchronize them.
//! - Undoing a register removes the newest live record equal to the logged
//!   snapshot, never just the first title match.
//! - Undo replays never push new entries; there is no redo.
//! - Failed operations leave the catalog unchanged.

use crate::config::{CatalogConfig, DuplicatePolicy};
use crate::error::{CatalogError, CatalogResult};
use crate::history::undo_log::UndoLog;
use crate::index::recency_list::RecencyList;
use crate::index::sorted_index::SortedIndex;
use crate::model::book::{BookField, BookRecord};
use crate::model::undo::UndoKind;
use crate::store::record_store::{BookId, RecordStore};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Result of a successful `register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub id: BookId,
    /// Fields shortened under `FieldPolicy::Truncate`. Empty otherwise.
    pub truncated: Vec<BookField>,
}

/// What an `undo` call reverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// A register was undone; carries the removed record.
    Unregistered(BookRecord),
    /// A remove was undone; carries the restored record.
    Restored(BookRecord),
}

/// Counts released by `teardown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub records_freed: usize,
    pub undo_entries_freed: usize,
}

/// In-memory book catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    config: CatalogConfig,
    store: RecordStore,
    sorted: SortedIndex,
    recency: RecencyList,
    undo: UndoLog,
}

impl Catalog {
    /// Creates an empty catalog with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> CatalogConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.depth()
    }

    /// Registers a record and links it into both indexes.
    ///
    /// # Errors
    /// - `FieldTooLong` under `FieldPolicy::Reject`.
    /// - `DuplicateTitle` under `DuplicatePolicy::Reject`.
    /// - `StoreFull` when the record store has no slot left.
    pub fn register(&mut self, title: &str, author: &str, year: i32) -> CatalogResult<Registered> {
        self.register_inner(title, author, year, true)
    }

    /// Removes the record with `title` from both indexes and frees it.
    ///
    /// Returns the removed record.
    ///
    /// # Errors
    /// - `NotFound` when no record has exactly this title.
    pub fn remove(&mut self, title: &str) -> CatalogResult<BookRecord> {
        let Some(id) = self.sorted.search(title) else {
            debug!("event=book_remove module=catalog status=not_found");
            return Err(CatalogError::NotFound(title.to_string()));
        };
        if !self.recency.contains(id) {
            warn!("event=book_remove module=catalog status=desync id={}", id);
            return Err(CatalogError::NotFound(title.to_string()));
        }

        // Detaches the node `search` resolved.
        self.sorted.delete(title);
        let Some(record) = self.recency.remove(&mut self.store, id) else {
            warn!("event=book_remove module=catalog status=stale id={}", id);
            return Err(CatalogError::NotFound(title.to_string()));
        };

        self.undo
            .push(UndoKind::Remove, &record.title, &record.author, record.year);
        info!("event=book_remove module=catalog status=ok id={}", id);
        Ok(record)
    }

    /// Looks up a record by exact title and returns a copy.
    ///
    /// # Errors
    /// - `NotFound` when no record has exactly this title.
    pub fn search(&self, title: &str) -> CatalogResult<BookRecord> {
        self.sorted
            .search(title)
            .and_then(|id| self.store.get(id))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(title.to_string()))
    }

    /// Records in ascending title order. An empty catalog yields nothing.
    pub fn list(&self) -> impl Iterator<Item = &BookRecord> + '_ {
        self.sorted.iter().filter_map(move |id| self.store.get(id))
    }

    /// Records newest first.
    pub fn recent(&self) -> impl Iterator<Item = &BookRecord> + '_ {
        self.recency.iter().filter_map(move |id| self.store.get(id))
    }

    /// Pops the last register/remove and applies its inverse.
    ///
    /// # Errors
    /// - `EmptyLog` when there is nothing to undo; nothing changes.
    /// - The inverse operation's error if it fails. The entry is consumed.
    pub fn undo(&mut self) -> CatalogResult<UndoOutcome> {
        let entry = self.undo.pop()?;
        debug!(
            "event=undo_replay module=catalog kind={:?} remaining={}",
            entry.kind,
            self.undo.depth()
        );
        match entry.kind {
            UndoKind::Register => {
                let snapshot = entry.to_record();
                self.unregister(&snapshot).map(UndoOutcome::Unregistered)
            }
            UndoKind::Remove => {
                self.register_inner(&entry.title, &entry.author, entry.year, false)?;
                Ok(UndoOutcome::Restored(entry.to_record()))
            }
        }
    }

    /// Frees every record and undo entry.
    ///
    /// Records are released only through the recency list; tree links are
    /// dropped without being followed.
    pub fn teardown(&mut self) -> TeardownReport {
        let records_freed = self.recency.release_all(&mut self.store);
        let leaked = self.store.clear();
        if leaked > 0 {
            warn!(
                "event=teardown module=catalog status=leak unlisted_records={}",
                leaked
            );
        }
        self.sorted.clear();
        let report = TeardownReport {
            records_freed: records_freed + leaked,
            undo_entries_freed: self.undo.clear(),
        };
        info!(
            "event=teardown module=catalog status=ok records_freed={} undo_entries_freed={}",
            report.records_freed, report.undo_entries_freed
        );
        report
    }

    /// Checks that the store and both indexes hold the same set of handles.
    pub fn is_consistent(&self) -> bool {
        let listed: HashSet<BookId> = self.recency.iter().collect();
        let sorted: HashSet<BookId> = self.sorted.iter().collect();
        listed.len() == self.store.len()
            && self.recency.len() == self.store.len()
            && self.sorted.len() == self.store.len()
            && listed == sorted
            && listed.iter().all(|id| self.store.contains(*id))
    }

    fn register_inner(
        &mut self,
        title: &str,
        author: &str,
        year: i32,
        record_undo: bool,
    ) -> CatalogResult<Registered> {
        let normalized = BookRecord::normalized(title, author, year, self.config.field_policy)?;
        let record = normalized.record;

        if self.config.duplicate_policy == DuplicatePolicy::Reject
            && self.sorted.search(&record.title).is_some()
        {
            return Err(CatalogError::DuplicateTitle(record.title));
        }

        let id = self.store.insert(record)?;
        self.recency.insert_front(id);
        if let Some(stored) = self.store.get(id) {
            self.sorted.insert(id, &stored.title);
            if record_undo {
                self.undo
                    .push(UndoKind::Register, &stored.title, &stored.author, stored.year);
            }
        }

        info!(
            "event=book_register module=catalog status=ok id={} truncated={} undoable={}",
            id,
            normalized.truncated.len(),
            record_undo
        );
        Ok(Registered {
            id,
            truncated: normalized.truncated,
        })
    }

    /// Removes the newest live record equal to `snapshot`.
    fn unregister(&mut self, snapshot: &BookRecord) -> CatalogResult<BookRecord> {
        let not_found = || CatalogError::NotFound(snapshot.title.clone());
        let id = self
            .recency
            .find_first(&self.store, |record| record == snapshot)
            .ok_or_else(not_found)?;
        if self.sorted.delete_handle(&snapshot.title, id).is_none() {
            warn!("event=undo_register module=catalog status=desync id={}", id);
            return Err(not_found());
        }
        let record = self.recency.remove(&mut self.store, id).ok_or_else(not_found)?;
        info!(
            "event=book_remove module=catalog status=ok id={} undoable=false",
            id
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, UndoOutcome};
    use crate::error::CatalogError;
    use crate::model::book::BookRecord;
    use crate::store::record_store::RecordStore;

    #[test]
    fn register_links_record_into_both_indexes() {
        let mut catalog = Catalog::new();
        let registered = catalog
            .register("Dune", "Herbert", 1965)
            .expect("register Dune");
        assert!(registered.truncated.is_empty());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.list().count(), 1);
        assert_eq!(catalog.recent().count(), 1);
        assert!(catalog.is_consistent());
    }

    #[test]
    fn failed_remove_does_not_touch_undo_log() {
        let mut catalog = Catalog::new();
        catalog
            .register("Dune", "Herbert", 1965)
            .expect("register Dune");
        let err = catalog.remove("Emma").expect_err("Emma was never registered");
        assert_eq!(err, CatalogError::NotFound("Emma".to_string()));
        assert_eq!(catalog.undo_depth(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn undo_replay_is_not_recorded() {
        let mut catalog = Catalog::new();
        catalog
            .register("Dune", "Herbert", 1965)
            .expect("register Dune");
        catalog.remove("Dune").expect("remove Dune");
        assert_eq!(catalog.undo_depth(), 2);

        let outcome = catalog.undo().expect("undo remove");
        assert!(matches!(outcome, UndoOutcome::Restored(ref book) if book.year == 1965));
        assert_eq!(catalog.undo_depth(), 1);
        assert!(catalog.is_consistent());
    }

    #[test]
    fn teardown_releases_everything_once() {
        let mut catalog = Catalog::new();
        for year in 0..5 {
            catalog
                .register(&format!("t{year}"), "a", year)
                .expect("register numbered title");
        }
        catalog.remove("t2").expect("remove t2");

        let report = catalog.teardown();
        assert_eq!(report.records_freed, 4);
        assert_eq!(report.undo_entries_freed, 6);
        assert!(catalog.is_empty());
        assert_eq!(catalog.list().count(), 0);
        assert!(catalog.is_consistent());
        assert_eq!(catalog.teardown(), Default::default());
    }

    #[test]
    fn full_store_rejects_register_without_logging_it() {
        let mut catalog = Catalog {
            store: RecordStore::with_slot_limit(1),
            ..Catalog::default()
        };
        catalog
            .register("Dune", "Herbert", 1965)
            .expect("register Dune");

        let err = catalog
            .register("Emma", "Austen", 1815)
            .expect_err("store holds one record");
        assert_eq!(err, CatalogError::StoreFull);
        assert_eq!(catalog.undo_depth(), 1);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.is_consistent());
    }

    #[test]
    fn remove_of_unlisted_handle_leaves_tree_untouched() {
        let mut catalog = Catalog::new();
        let registered = catalog
            .register("Dune", "Herbert", 1965)
            .expect("register Dune");
        catalog
            .recency
            .remove(&mut catalog.store, registered.id)
            .expect("handle is listed");

        let err = catalog.remove("Dune").expect_err("handle is no longer listed");
        assert_eq!(err, CatalogError::NotFound("Dune".to_string()));
        assert_eq!(catalog.sorted.search("Dune"), Some(registered.id));
        assert_eq!(catalog.sorted.len(), 1);
        assert_eq!(catalog.undo_depth(), 1);
    }

    #[test]
    fn undo_register_skips_records_that_differ_from_the_snapshot() {
        let mut catalog = Catalog::new();
        catalog
            .register("Dune", "Herbert", 1965)
            .expect("register first Dune");
        catalog
            .register("Dune", "Anderson", 1965)
            .expect("register second Dune");
        catalog
            .register("Emma", "Austen", 1815)
            .expect("register Emma");
        catalog.undo().expect("undo Emma");

        let outcome = catalog.undo().expect("undo second Dune");
        assert_eq!(
            outcome,
            UndoOutcome::Unregistered(BookRecord::new("Dune", "Anderson", 1965))
        );
        assert_eq!(
            catalog.search("Dune").expect("first Dune remains").author,
            "Herbert"
        );
        assert!(catalog.is_consistent());
    }
}
