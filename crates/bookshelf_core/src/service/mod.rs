//! Catalog use-case layer.
//!
//! # Responsibility
//! - Compose the record store, both indexes and the undo log into the public
//!   catalog operations.
//! - Keep front ends decoupled from index bookkeeping.

pub mod catalog;
