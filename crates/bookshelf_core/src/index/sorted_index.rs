//! Title-ordered search tree over record handles.
//!
//! # Responsibility
//! - Exact-title lookup, ordered traversal and deletion by title.
//!
//! # Invariants
//! - In-order key sequence is non-decreasing. New keys equal to an existing
//!   one go right, so duplicate titles are kept and enumerate in insertion
//!   order. Rotations may move an equal key into a left subtree, so a
//!   subtree's left side holds keys `<=` the node key.
//! - Subtree heights differ by at most one (AVL), which bounds recursion depth.
//! - Deletion relinks nodes; it never rewrites a node's key or record handle.
//! - The index never frees records. It only reports which handle it detached.

use crate::store::record_store::BookId;
use std::cmp::Ordering;

type NodeId = usize;

#[derive(Debug, Clone)]
struct TreeNode {
    book: BookId,
    /// Copy of the record title. Records are immutable once stored, so the
    /// copy can't drift from the store.
    key: String,
    left: Option<NodeId>,
    right: Option<NodeId>,
    height: u32,
}

/// Balanced search tree keyed by title.
#[derive(Debug, Default)]
pub struct SortedIndex {
    nodes: Vec<TreeNode>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl SortedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; `0` when empty.
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Links `book` under `title`. Equal titles go to the right.
    pub fn insert(&mut self, book: BookId, title: &str) {
        let node = TreeNode {
            book,
            key: title.to_string(),
            left: None,
            right: None,
            height: 1,
        };
        let new_id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        let root = self.root;
        self.root = Some(self.insert_at(root, new_id));
        self.len += 1;
    }

    /// Returns the first handle whose title equals `title` on a top-down
    /// descent. With duplicates, the one found depends on tree shape.
    pub fn search(&self, title: &str) -> Option<BookId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            match title.cmp(node.key.as_str()) {
                Ordering::Equal => return Some(node.book),
                Ordering::Less => cursor = node.left,
                Ordering::Greater => cursor = node.right,
            }
        }
        None
    }

    /// Detaches the node `search` would find for `title`.
    ///
    /// Returns the detached handle, or `None` when no title matches. The
    /// caller remains responsible for unlinking and freeing the record.
    pub fn delete(&mut self, title: &str) -> Option<BookId> {
        self.delete_matching(title, None)
    }

    /// Detaches the node holding exactly `book` under `title`.
    ///
    /// Among duplicate titles this picks the given handle rather than the
    /// first one found. Returns `None` when `book` is not indexed under
    /// `title`.
    pub fn delete_handle(&mut self, title: &str, book: BookId) -> Option<BookId> {
        self.delete_matching(title, Some(book))
    }

    fn delete_matching(&mut self, title: &str, target: Option<BookId>) -> Option<BookId> {
        let root = self.root;
        let (new_root, detached) = self.delete_at(root, title, target);
        self.root = new_root;
        let detached = detached?;
        self.free.push(detached);
        self.len -= 1;
        Some(self.nodes[detached].book)
    }

    /// Ascending-title traversal. Each call starts a fresh walk.
    pub fn iter(&self) -> InOrder<'_> {
        InOrder {
            index: self,
            stack: Vec::new(),
            cursor: self.root,
        }
    }

    /// Drops every link without walking the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    fn insert_at(&mut self, node: Option<NodeId>, new_id: NodeId) -> NodeId {
        let Some(current) = node else {
            return new_id;
        };
        if self.nodes[new_id].key < self.nodes[current].key {
            let left = self.nodes[current].left;
            let child = self.insert_at(left, new_id);
            self.nodes[current].left = Some(child);
        } else {
            let right = self.nodes[current].right;
            let child = self.insert_at(right, new_id);
            self.nodes[current].right = Some(child);
        }
        self.rebalance(current)
    }

    /// Returns `(new subtree root, detached node)`.
    ///
    /// With `target = None` the first title match on the descent is detached.
    /// Otherwise equal-key nodes are searched, left side first, for `target`.
    fn delete_at(
        &mut self,
        node: Option<NodeId>,
        title: &str,
        target: Option<BookId>,
    ) -> (Option<NodeId>, Option<NodeId>) {
        let Some(current) = node else {
            return (None, None);
        };
        match title.cmp(self.nodes[current].key.as_str()) {
            Ordering::Less => self.delete_in_left(current, title, target),
            Ordering::Greater => self.delete_in_right(current, title, target),
            Ordering::Equal => {
                if target.map_or(true, |book| self.nodes[current].book == book) {
                    return (self.unlink(current), Some(current));
                }
                let (root, detached) = self.delete_in_left(current, title, target);
                if detached.is_some() {
                    return (root, detached);
                }
                self.delete_in_right(current, title, target)
            }
        }
    }

    fn delete_in_left(
        &mut self,
        current: NodeId,
        title: &str,
        target: Option<BookId>,
    ) -> (Option<NodeId>, Option<NodeId>) {
        let left = self.nodes[current].left;
        let (child, detached) = self.delete_at(left, title, target);
        if detached.is_none() {
            return (Some(current), None);
        }
        self.nodes[current].left = child;
        (Some(self.rebalance(current)), detached)
    }

    fn delete_in_right(
        &mut self,
        current: NodeId,
        title: &str,
        target: Option<BookId>,
    ) -> (Option<NodeId>, Option<NodeId>) {
        let right = self.nodes[current].right;
        let (child, detached) = self.delete_at(right, title, target);
        if detached.is_none() {
            return (Some(current), None);
        }
        self.nodes[current].right = child;
        (Some(self.rebalance(current)), detached)
    }

    /// Removes `current` from its position and returns the node that takes
    /// its place.
    fn unlink(&mut self, current: NodeId) -> Option<NodeId> {
        let left = self.nodes[current].left;
        let right = self.nodes[current].right;
        match (left, right) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(_), Some(right)) => {
                // Successor takes over this position; no key is copied.
                let (rest, successor) = self.detach_min(right);
                self.nodes[successor].left = left;
                self.nodes[successor].right = rest;
                Some(self.rebalance(successor))
            }
        }
    }

    /// Returns `(subtree root without its minimum, minimum node)`.
    fn detach_min(&mut self, node: NodeId) -> (Option<NodeId>, NodeId) {
        match self.nodes[node].left {
            None => (self.nodes[node].right, node),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.nodes[node].left = rest;
                (Some(self.rebalance(node)), min)
            }
        }
    }

    fn height_of(&self, node: Option<NodeId>) -> u32 {
        node.map_or(0, |id| self.nodes[id].height)
    }

    fn update_height(&mut self, node: NodeId) {
        let left = self.height_of(self.nodes[node].left);
        let right = self.height_of(self.nodes[node].right);
        self.nodes[node].height = 1 + left.max(right);
    }

    fn balance_factor(&self, node: NodeId) -> i64 {
        i64::from(self.height_of(self.nodes[node].left))
            - i64::from(self.height_of(self.nodes[node].right))
    }

    fn rebalance(&mut self, node: NodeId) -> NodeId {
        self.update_height(node);
        let balance = self.balance_factor(node);
        if balance > 1 {
            if let Some(left) = self.nodes[node].left {
                if self.balance_factor(left) < 0 {
                    let rotated = self.rotate_left(left);
                    self.nodes[node].left = Some(rotated);
                }
            }
            return self.rotate_right(node);
        }
        if balance < -1 {
            if let Some(right) = self.nodes[node].right {
                if self.balance_factor(right) > 0 {
                    let rotated = self.rotate_right(right);
                    self.nodes[node].right = Some(rotated);
                }
            }
            return self.rotate_left(node);
        }
        node
    }

    fn rotate_right(&mut self, node: NodeId) -> NodeId {
        let Some(pivot) = self.nodes[node].left else {
            return node;
        };
        self.nodes[node].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(node);
        self.update_height(node);
        self.update_height(pivot);
        pivot
    }

    fn rotate_left(&mut self, node: NodeId) -> NodeId {
        let Some(pivot) = self.nodes[node].right else {
            return node;
        };
        self.nodes[node].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(node);
        self.update_height(node);
        self.update_height(pivot);
        pivot
    }
}

/// Lazy in-order walk driven by an explicit stack.
pub struct InOrder<'a> {
    index: &'a SortedIndex,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
}

impl Iterator for InOrder<'_> {
    type Item = BookId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = self.index.nodes[id].left;
        }
        let id = self.stack.pop()?;
        let node = &self.index.nodes[id];
        self.cursor = node.right;
        Some(node.book)
    }
}

#[cfg(test)]
mod tests {
    use super::SortedIndex;
    use crate::model::book::BookRecord;
    use crate::store::record_store::{BookId, RecordStore};

    fn build(titles: &[&str]) -> (RecordStore, SortedIndex, Vec<BookId>) {
        let mut store = RecordStore::new();
        let mut index = SortedIndex::new();
        let mut ids = Vec::new();
        for (year, title) in titles.iter().enumerate() {
            let id = store
                .insert(BookRecord::new(*title, "author", year as i32))
                .expect("store has room");
            index.insert(id, title);
            ids.push(id);
        }
        (store, index, ids)
    }

    fn titles(store: &RecordStore, index: &SortedIndex) -> Vec<String> {
        index
            .iter()
            .map(|id| store.get(id).expect("indexed handle must be live").title.clone())
            .collect()
    }

    #[test]
    fn iter_yields_ascending_titles() {
        let (store, index, _) = build(&["m", "c", "x", "a", "e"]);
        assert_eq!(titles(&store, &index), vec!["a", "c", "e", "m", "x"]);
        // restartable
        assert_eq!(index.iter().count(), 5);
    }

    #[test]
    fn sorted_insertion_keeps_height_logarithmic() {
        let names: Vec<String> = (0..1024).map(|i| format!("title-{i:05}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_, index, _) = build(&refs);
        assert_eq!(index.len(), 1024);
        // AVL height bound: < 1.45 * log2(n + 2)
        assert!(index.height() <= 15, "height was {}", index.height());
    }

    #[test]
    fn duplicates_enumerate_in_insertion_order() {
        let mut store = RecordStore::new();
        let mut index = SortedIndex::new();
        let first = store
            .insert(BookRecord::new("same", "a", 1))
            .expect("store has room");
        let second = store
            .insert(BookRecord::new("same", "b", 2))
            .expect("store has room");
        index.insert(first, "same");
        index.insert(second, "same");
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![first, second]);
    }

    #[test]
    fn delete_with_two_children_relinks_successor() {
        let (store, mut index, ids) = build(&["d", "b", "f", "a", "c", "e", "g"]);
        let detached = index.delete("d").expect("d is indexed");
        assert_eq!(detached, ids[0]);
        assert_eq!(titles(&store, &index), vec!["a", "b", "c", "e", "f", "g"]);
        assert_eq!(index.search("e"), Some(ids[5]));
        assert_eq!(index.search("d"), None);
    }

    #[test]
    fn delete_handle_picks_the_requested_duplicate() {
        let (store, mut index, ids) = build(&["dup", "a", "dup", "z", "dup", "dup", "dup"]);
        // neither the first nor the last duplicate in title order
        assert_eq!(index.delete_handle("dup", ids[4]), Some(ids[4]));
        assert_eq!(index.delete_handle("dup", ids[4]), None);
        assert_eq!(index.delete_handle("a", ids[0]), None);

        let remaining: Vec<i32> = index
            .iter()
            .filter_map(|id| store.get(id))
            .filter(|record| record.title == "dup")
            .map(|record| record.year)
            .collect();
        assert_eq!(remaining, vec![0, 2, 5, 6]);
        assert_eq!(index.len(), 6);
    }

    #[test]
    fn delete_handle_finds_every_duplicate() {
        let titles: Vec<&str> = vec!["k"; 64];
        let (_, mut index, ids) = build(&titles);
        for id in ids.iter().rev().step_by(2).chain(ids.iter().rev().skip(1).step_by(2)) {
            assert_eq!(index.delete_handle("k", *id), Some(*id));
        }
        assert!(index.is_empty());
    }

    #[test]
    fn delete_leaf_and_single_child() {
        let (store, mut index, ids) = build(&["b", "a", "c", "d"]);
        assert_eq!(index.delete("a"), Some(ids[1]));
        assert_eq!(index.delete("c"), Some(ids[2]));
        assert_eq!(titles(&store, &index), vec!["b", "d"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn delete_missing_title_changes_nothing() {
        let (store, mut index, _) = build(&["b", "a", "c"]);
        assert_eq!(index.delete("zzz"), None);
        assert_eq!(titles(&store, &index), vec!["a", "b", "c"]);
    }

    #[test]
    fn delete_everything_in_mixed_order() {
        let names: Vec<String> = (0..200).map(|i| format!("{:03}", (i * 37) % 200)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_, mut index, _) = build(&refs);
        for i in 0..200 {
            assert!(index.delete(&format!("{i:03}")).is_some());
        }
        assert!(index.is_empty());
        assert_eq!(index.height(), 0);
        assert_eq!(index.iter().next(), None);
    }
}
