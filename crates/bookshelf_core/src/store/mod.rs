//! Record ownership layer.
//!
//! # Responsibility
//! - Allocate and free record memory on behalf of the catalog.
//! - Hand out stable handles that indexes can link without owning records.
//!
//! # Invariants
//! - Only the store creates or destroys `BookRecord` values.
//! - A freed handle never resolves again, even after its slot is reused.

pub mod record_store;
