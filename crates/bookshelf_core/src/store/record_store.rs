//! Generational arena of book records.

use crate::error::{CatalogError, CatalogResult};
use crate::model::book::BookRecord;
use std::fmt::{Display, Formatter};

/// Stable handle to a record slot.
///
/// `generation` changes every time a slot is reused, so stale handles held by
/// an index fail to resolve instead of aliasing a newer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId {
    index: u32,
    generation: u32,
}

impl BookId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    record: Option<BookRecord>,
}

/// Owner of every live record.
///
/// Slot indexes are `u32`, so at most `u32::MAX` records can be live at once.
#[derive(Debug)]
pub struct RecordStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    slot_limit: u32,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            slot_limit: u32::MAX,
        }
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_slot_limit(slot_limit: u32) -> Self {
        Self {
            slot_limit,
            ..Self::default()
        }
    }

    /// Moves `record` into the store and returns its handle.
    ///
    /// # Errors
    /// - `CatalogError::StoreFull` when every slot index is in use.
    pub fn insert(&mut self, record: BookRecord) -> CatalogResult<BookId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.record = Some(record);
            self.live += 1;
            return Ok(BookId {
                index,
                generation: slot.generation,
            });
        }

        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|index| *index < self.slot_limit)
            .ok_or(CatalogError::StoreFull)?;
        self.slots.push(Slot {
            generation: 0,
            record: Some(record),
        });
        self.live += 1;
        Ok(BookId {
            index,
            generation: 0,
        })
    }

    pub fn get(&self, id: BookId) -> Option<&BookRecord> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.record.as_ref())
    }

    pub fn contains(&self, id: BookId) -> bool {
        self.get(id).is_some()
    }

    /// Frees the record behind `id`.
    ///
    /// Returns `None` when the handle is stale or was already freed, so a
    /// record can never be released twice.
    pub fn remove(&mut self, id: BookId) -> Option<BookRecord> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let record = slot.record.take()?;
        self.free.push(id.index);
        self.live -= 1;
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Frees every record and returns how many were live.
    pub fn clear(&mut self) -> usize {
        let freed = self.live;
        self.slots.clear();
        self.free.clear();
        self.live = 0;
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::error::CatalogError;
    use crate::model::book::BookRecord;

    fn book(title: &str) -> BookRecord {
        BookRecord::new(title, "author", 2000)
    }

    #[test]
    fn insert_and_get_resolve_the_same_record() {
        let mut store = RecordStore::new();
        let id = store.insert(book("Dune")).expect("store has room");
        assert_eq!(store.get(id).map(|b| b.title.as_str()), Some("Dune"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_frees_exactly_once() {
        let mut store = RecordStore::new();
        let id = store.insert(book("Dune")).expect("store has room");
        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn reused_slot_does_not_resolve_stale_handle() {
        let mut store = RecordStore::new();
        let stale = store.insert(book("old")).expect("store has room");
        store.remove(stale);
        let fresh = store.insert(book("new")).expect("store has room");

        assert_eq!(stale.index(), fresh.index());
        assert_ne!(stale.generation(), fresh.generation());
        assert!(store.get(stale).is_none());
        assert_eq!(store.get(fresh).map(|b| b.title.as_str()), Some("new"));
    }

    #[test]
    fn clear_reports_live_count() {
        let mut store = RecordStore::new();
        let a = store.insert(book("a")).expect("store has room");
        store.insert(book("b")).expect("store has room");
        store.insert(book("c")).expect("store has room");
        store.remove(a);
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn full_store_reports_error_and_reuses_freed_slots() {
        let mut store = RecordStore::with_slot_limit(2);
        let first = store.insert(book("a")).expect("store has room");
        store.insert(book("b")).expect("store has room");

        assert_eq!(store.insert(book("c")), Err(CatalogError::StoreFull));
        assert_eq!(store.len(), 2);

        store.remove(first);
        let reused = store.insert(book("c")).expect("freed slot is reusable");
        assert_eq!(reused.index(), first.index());
        assert_eq!(store.len(), 2);
    }
}
