//! Case-insensitive substring filter on item names.
//!
//! # Invariants
//! - Empty query text matches every item.
//! - Query text is used as typed; surrounding whitespace is significant.
//! - Result order equals snapshot order.

use crate::model::item::Item;

/// Returns whether `name` contains `query`, ignoring case.
pub fn name_matches(name: &str, query: &str) -> bool {
    query.is_empty() || contains_lowered(name, &query.to_lowercase())
}

/// Returns the items whose name matches `query`, in snapshot order.
pub fn filter_by_name(items: &[Item], query: &str) -> Vec<Item> {
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| contains_lowered(&item.name, &needle))
        .cloned()
        .collect()
}

fn contains_lowered(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}
