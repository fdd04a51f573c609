//! Name search over in-memory snapshots.
//!
//! # Responsibility
//! - Filter item snapshots by the current search text.
//! - Keep matching rules in one place for store and FFI callers.

pub mod filter;
