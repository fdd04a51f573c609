//! Catalog configuration.
//!
//! # Responsibility
//! - Describe where collections live and where seeds come from.
//! - Select save semantics for the add flow.
//!
//! # Invariants
//! - Configuration is supplied by the host app; nothing is read from the
//!   environment or from config files.

use crate::repo::seed::{BundledSeeds, DirSeeds, SeedSource};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

/// Where first-run seed collections are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeedConfig {
    /// Seeds compiled into the core library.
    #[default]
    Bundled,
    /// Directory containing `mock-found-items.json` and `mock-lost-items.json`.
    Dir(PathBuf),
}

/// How `add` treats the durable write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistMode {
    /// Return immediately; the write trails the in-memory update.
    #[default]
    FireAndForget,
    /// Wait for the write (and its read-back check) before returning.
    Blocking,
}

/// Configuration errors detected by [`CatalogConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataDir,
    EmptySeedDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataDir => write!(f, "data_dir cannot be empty"),
            Self::EmptySeedDir => write!(f, "seed directory cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Catalog configuration supplied at facade construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Directory holding `found-items.json` and `lost-items.json`.
    pub data_dir: PathBuf,
    pub seeds: SeedConfig,
    pub persist_mode: PersistMode,
    /// Re-read each collection after saving and compare with what was written.
    pub verify_after_save: bool,
}

impl CatalogConfig {
    /// Creates a configuration with bundled seeds, fire-and-forget saves and
    /// read-back verification enabled.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            seeds: SeedConfig::Bundled,
            persist_mode: PersistMode::FireAndForget,
            verify_after_save: true,
        }
    }

    pub fn with_seed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.seeds = SeedConfig::Dir(dir.into());
        self
    }

    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }

    pub fn with_verify_after_save(mut self, enabled: bool) -> Self {
        self.verify_after_save = enabled;
        self
    }

    /// Rejects configurations that cannot address any storage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if let SeedConfig::Dir(dir) = &self.seeds {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::EmptySeedDir);
            }
        }
        Ok(())
    }

    pub(crate) fn seed_source(&self) -> Arc<dyn SeedSource> {
        match &self.seeds {
            SeedConfig::Bundled => Arc::new(BundledSeeds),
            SeedConfig::Dir(dir) => Arc::new(DirSeeds::new(dir.clone())),
        }
    }
}
