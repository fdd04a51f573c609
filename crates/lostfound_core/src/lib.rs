//! Core storage and state for the lost & found catalog app.
//! UI layers call into [`CatalogFacade`]; everything below it is plain Rust.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod store;

pub use catalog::facade::CatalogFacade;
pub use catalog::observable::{Observable, SubscriptionId};
pub use config::{CatalogConfig, ConfigError, PersistMode, SeedConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::category::{Category, CategoryParseError};
pub use model::image::{decode_image, encode_image, ImageDecodeError};
pub use model::item::{Item, ItemDraft, ItemId};
pub use repo::item_repo::{ItemRepository, JsonFileItemRepository, RepoError, RepoResult};
pub use repo::seed::{ensure_seeded, BundledSeeds, DirSeeds, SeedError, SeedOutcome, SeedSource};
pub use search::filter::{filter_by_name, name_matches};
pub use store::ids::IdGenerator;
pub use store::item_store::ItemStore;
pub use store::persist_worker::{PersistError, PersistOutcome, PersistTicket, SaveCheck};
pub use store::StoreError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
