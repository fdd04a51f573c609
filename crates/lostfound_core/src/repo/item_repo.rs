//! Item repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Provide whole-collection read/write over one file per category.
//! - Keep file naming and JSON encoding inside the persistence boundary.
//!
//! # Invariants
//! - A collection is always written as one pretty-printed JSON array.
//! - Seeds are installed byte-for-byte, never re-encoded.
//! - Reads never repair or partially accept malformed content.

use crate::model::category::Category;
use crate::model::item::Item;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection file access and JSON coding.
#[derive(Debug)]
pub enum RepoError {
    /// File could not be read, created or written.
    Io { path: PathBuf, source: io::Error },
    /// File content is not a JSON array of items.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// In-memory collection could not be encoded.
    Encode(serde_json::Error),
}

impl RepoError {
    /// Returns whether the failure is a missing collection file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at `{}`: {source}", path.display()),
            Self::Malformed { path, source } => {
                write!(f, "malformed item collection `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode item collection: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Repository interface for per-category item collections.
///
/// Implementations are shared with the background persistence worker, so
/// they must be `Send + Sync`.
pub trait ItemRepository: Send + Sync {
    /// Returns whether a persisted collection exists for `category`.
    fn exists(&self, category: Category) -> bool;
    /// Reads and parses the full persisted collection.
    fn read_items(&self, category: Category) -> RepoResult<Vec<Item>>;
    /// Replaces the full persisted collection.
    fn write_items(&self, category: Category, items: &[Item]) -> RepoResult<()>;
    /// Stores raw seed bytes as the persisted collection.
    fn install_seed(&self, category: Category, seed: &[u8]) -> RepoResult<()>;
}

/// File-backed repository rooted at an app data directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileItemRepository {
    data_dir: PathBuf,
}

impl JsonFileItemRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Absolute location of the persisted collection for `category`.
    pub fn items_path(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.items_file_name())
    }

    fn write_bytes(&self, category: Category, bytes: &[u8]) -> RepoResult<()> {
        let path = self.items_path(category);
        std::fs::create_dir_all(&self.data_dir).map_err(|source| RepoError::Io {
            path: self.data_dir.clone(),
            source,
        })?;
        std::fs::write(&path, bytes).map_err(|source| RepoError::Io { path, source })
    }
}

impl ItemRepository for JsonFileItemRepository {
    fn exists(&self, category: Category) -> bool {
        self.items_path(category).is_file()
    }

    fn read_items(&self, category: Category) -> RepoResult<Vec<Item>> {
        let path = self.items_path(category);
        let text = std::fs::read_to_string(&path).map_err(|source| RepoError::Io {
            path: path.clone(),
            source,
        })?;
        parse_items(&text).map_err(|source| RepoError::Malformed { path, source })
    }

    fn write_items(&self, category: Category, items: &[Item]) -> RepoResult<()> {
        let started_at = Instant::now();
        let json = encode_items(items)?;
        match self.write_bytes(category, json.as_bytes()) {
            Ok(()) => {
                debug!(
                    "event=repo_write module=repo status=ok category={} count={} bytes={} duration_ms={}",
                    category,
                    items.len(),
                    json.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=repo_write module=repo status=error category={} error_code=write_failed error={}",
                    category, err
                );
                Err(err)
            }
        }
    }

    fn install_seed(&self, category: Category, seed: &[u8]) -> RepoResult<()> {
        self.write_bytes(category, seed)
    }
}

/// Parses a persisted collection.
pub fn parse_items(text: &str) -> Result<Vec<Item>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Encodes a collection in the persisted pretty-printed layout.
pub fn encode_items(items: &[Item]) -> RepoResult<String> {
    serde_json::to_string_pretty(items).map_err(RepoError::Encode)
}
