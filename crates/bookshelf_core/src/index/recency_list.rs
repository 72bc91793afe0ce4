//! Newest-first singly linked list of record handles.
//!
//! # Responsibility
//! - Enumerate every live record, most recently registered first.
//! - Drive record deallocation: a record is freed only when it leaves this
//!   list.
//!
//! # Invariants
//! - A handle is in the list iff its record is live in the store.
//! - Removal calls unlink at most one handle.

use crate::model::book::BookRecord;
use crate::store::record_store::{BookId, RecordStore};
use std::collections::HashMap;

/// Head-insert linked list. Links are stored per handle, outside the records.
#[derive(Debug, Default)]
pub struct RecencyList {
    head: Option<BookId>,
    next: HashMap<BookId, Option<BookId>>,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Makes `id` the new head in O(1).
    pub fn insert_front(&mut self, id: BookId) {
        let previous_head = self.head.replace(id);
        self.next.insert(id, previous_head);
    }

    /// Unlinks `id` and frees its record.
    pub fn remove(&mut self, store: &mut RecordStore, id: BookId) -> Option<BookRecord> {
        let unlinked = self.unlink_first(|candidate| candidate == id)?;
        store.remove(unlinked)
    }

    pub fn contains(&self, id: BookId) -> bool {
        self.next.contains_key(&id)
    }

    /// Scans from the head and returns the newest handle whose record
    /// satisfies `matches`.
    pub fn find_first(
        &self,
        store: &RecordStore,
        mut matches: impl FnMut(&BookRecord) -> bool,
    ) -> Option<BookId> {
        self.iter()
            .find(|id| store.get(*id).is_some_and(|record| matches(record)))
    }

    /// Newest-first walk over handles.
    pub fn iter(&self) -> RecencyIter<'_> {
        RecencyIter {
            list: self,
            cursor: self.head,
        }
    }

    /// Unlinks every handle head to tail, freeing each record once.
    ///
    /// Returns the number of records freed.
    pub fn release_all(&mut self, store: &mut RecordStore) -> usize {
        let mut freed = 0;
        let mut cursor = self.head.take();
        while let Some(id) = cursor {
            cursor = self.next.remove(&id).flatten();
            if store.remove(id).is_some() {
                freed += 1;
            }
        }
        self.next.clear();
        freed
    }

    fn unlink_first(&mut self, mut matches: impl FnMut(BookId) -> bool) -> Option<BookId> {
        let mut previous: Option<BookId> = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let following = self.next.get(&id).copied().flatten();
            if matches(id) {
                match previous {
                    None => self.head = following,
                    Some(prev) => {
                        self.next.insert(prev, following);
                    }
                }
                self.next.remove(&id);
                return Some(id);
            }
            previous = Some(id);
            cursor = following;
        }
        None
    }
}

pub struct RecencyIter<'a> {
    list: &'a RecencyList,
    cursor: Option<BookId>,
}

impl Iterator for RecencyIter<'_> {
    type Item = BookId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.list.next.get(&id).copied().flatten();
        Some(id)
    }
}
