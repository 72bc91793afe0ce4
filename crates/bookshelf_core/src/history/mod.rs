//! Operation history for single-step undo.
//!
//! # Responsibility
//! - Keep LIFO snapshots of register/remove mutations.
//!
//! # Invariants
//! - Entries are independent copies; they stay valid after the record they
//!   describe is freed.
//! - Each entry is popped at most once.

pub mod undo_log;
