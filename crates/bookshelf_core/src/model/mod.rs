//! Domain model for catalog records and undo snapshots.
//!
//! # Responsibility
//! - Define the record shape shared by every index.
//! - Own field-capacity rules applied before a record enters the catalog.
//!
//! # Invariants
//! - A `BookRecord` is owned by exactly one store slot; indexes hold handles.
//! - `UndoEntry` snapshots never borrow from live records.

pub mod book;
pub mod undo;
