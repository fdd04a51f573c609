//! Repository layer for persisted item collections.
//!
//! # Responsibility
//! - Define the storage contract the item store depends on.
//! - Isolate file paths, JSON encoding and seed installation.
//!
//! # Invariants
//! - One persisted collection per category; categories never share a file.
//! - A seed is installed only when no persisted collection exists.

pub mod item_repo;
pub mod seed;
