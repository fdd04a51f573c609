//! First-run seed bootstrap.
//!
//! # Responsibility
//! - Resolve the seed collection for each category.
//! - Copy it into persisted storage when no collection exists yet.
//!
//! # Invariants
//! - Bootstrap is idempotent: an existing collection is never overwritten.
//! - Seed bytes are copied verbatim.
//! - A failed bootstrap leaves the collection absent so the next load retries.

use crate::model::category::Category;
use crate::repo::item_repo::{ItemRepository, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

const BUNDLED_FOUND_SEED: &[u8] = include_bytes!("../../assets/mock-found-items.json");
const BUNDLED_LOST_SEED: &[u8] = include_bytes!("../../assets/mock-lost-items.json");

/// Seed resolution or installation failure.
#[derive(Debug)]
pub enum SeedError {
    /// Seed source has no file for the category.
    Missing { category: Category, path: PathBuf },
    /// Seed file exists but could not be read.
    Io { path: PathBuf, source: io::Error },
    /// Seed could not be written into persisted storage.
    Install(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { category, path } => {
                write!(f, "no {category} seed at `{}`", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "failed to read seed `{}`: {source}", path.display())
            }
            Self::Install(err) => write!(f, "failed to install seed: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Install(err) => Some(err),
        }
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Install(value)
    }
}

/// Supplies the raw seed collection for a category.
pub trait SeedSource: Send + Sync {
    fn seed_bytes(&self, category: Category) -> Result<Vec<u8>, SeedError>;
}

/// Seeds compiled into the core library.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSeeds;

impl SeedSource for BundledSeeds {
    fn seed_bytes(&self, category: Category) -> Result<Vec<u8>, SeedError> {
        let bytes = match category {
            Category::Found => BUNDLED_FOUND_SEED,
            Category::Lost => BUNDLED_LOST_SEED,
        };
        Ok(bytes.to_vec())
    }
}

/// Seeds read from a directory holding `mock-*.json` files, such as an
/// unpacked platform asset folder.
#[derive(Debug, Clone)]
pub struct DirSeeds {
    dir: PathBuf,
}

impl DirSeeds {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SeedSource for DirSeeds {
    fn seed_bytes(&self, category: Category) -> Result<Vec<u8>, SeedError> {
        let path = self.dir.join(category.seed_file_name());
        std::fs::read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SeedError::Missing { category, path }
            } else {
                SeedError::Io { path, source }
            }
        })
    }
}

/// Result of a bootstrap attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// A persisted collection already existed; nothing was copied.
    AlreadyPresent,
    /// The seed was copied into persisted storage.
    Installed { bytes: usize },
}

/// Copies the category seed into storage unless a collection already exists.
///
/// # Errors
/// - Returns `SeedError::Missing`/`SeedError::Io` when the seed is unavailable.
/// - Returns `SeedError::Install` when storage rejects the write.
pub fn ensure_seeded(
    repo: &dyn ItemRepository,
    seeds: &dyn SeedSource,
    category: Category,
) -> Result<SeedOutcome, SeedError> {
    if repo.exists(category) {
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let result = seeds
        .seed_bytes(category)
        .and_then(|bytes| {
            repo.install_seed(category, &bytes)?;
            Ok(bytes.len())
        });

    match result {
        Ok(bytes) => {
            info!(
                "event=store_seed module=repo status=ok category={} seed={} target={} bytes={}",
                category,
                category.seed_file_name(),
                category.items_file_name(),
                bytes
            );
            Ok(SeedOutcome::Installed { bytes })
        }
        Err(err) => {
            error!(
                "event=store_seed module=repo status=error category={} seed={} error_code=seed_copy_failed error={}",
                category,
                category.seed_file_name(),
                err
            );
            Err(err)
        }
    }
}
