//! In-memory item store with background persistence.
//!
//! # Responsibility
//! - Own one snapshot per category and the shared search text.
//! - Bootstrap collections from seeds on first access.
//! - Persist full snapshots through a single FIFO worker.
//!
//! # Invariants
//! - Load and add never surface storage errors; failures are logged and
//!   degrade to empty snapshots.
//! - The in-memory snapshot is updated before its durable write starts.

use crate::config::ConfigError;
use crate::store::persist_worker::PersistError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod ids;
pub mod item_store;
pub mod persist_worker;

/// Store construction failure.
#[derive(Debug)]
pub enum StoreError {
    Config(ConfigError),
    Persist(PersistError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid catalog config: {err}"),
            Self::Persist(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<PersistError> for StoreError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}
