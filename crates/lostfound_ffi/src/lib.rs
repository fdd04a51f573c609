//! Flutter-facing bindings for the lost & found catalog core.

pub mod api;
