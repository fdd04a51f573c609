//! Presentation-facing catalog state.
//!
//! # Responsibility
//! - Publish store state as observable values.
//! - Be the single object UI layers call into.
//!
//! # See also
//! - `crate::store::item_store`

pub mod facade;
pub mod observable;
