//! Catalog domain model.
//!
//! # Responsibility
//! - Define the item record shared by the lost and found catalogs.
//! - Keep wire naming for persisted JSON in one place.
//!
//! # Invariants
//! - An `ItemId` is unique within one category snapshot.
//! - Items are never mutated after creation; there is no delete path.

pub mod category;
pub mod image;
pub mod item;
