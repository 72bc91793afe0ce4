//! Record indexes.
//!
//! # Responsibility
//! - `sorted_index`: title-ordered lookup and listing.
//! - `recency_list`: newest-first membership list and the only path that frees
//!   records.
//!
//! # Invariants
//! - Both indexes store `BookId` handles, never records.
//! - The catalog keeps both indexes in step; neither index calls the other.

pub mod recency_list;
pub mod sorted_index;
