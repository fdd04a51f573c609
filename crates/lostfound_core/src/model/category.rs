//! Catalog category (lost vs. found).
//!
//! Each category is backed by its own persisted collection and its own
//! bundled seed. There is no relation between the two.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Persisted collection file for found items.
pub const FOUND_ITEMS_FILE: &str = "found-items.json";
/// Persisted collection file for lost items.
pub const LOST_ITEMS_FILE: &str = "lost-items.json";
/// Bundled seed for found items.
pub const FOUND_SEED_FILE: &str = "mock-found-items.json";
/// Bundled seed for lost items.
pub const LOST_SEED_FILE: &str = "mock-lost-items.json";

/// One of the two independent item catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Lost,
    Found,
}

impl Category {
    /// Both categories in stable order.
    pub const ALL: [Category; 2] = [Category::Found, Category::Lost];

    /// Stable lowercase label (`lost|found`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }

    /// File name of the persisted collection inside the data directory.
    pub fn items_file_name(self) -> &'static str {
        match self {
            Self::Lost => LOST_ITEMS_FILE,
            Self::Found => FOUND_ITEMS_FILE,
        }
    }

    /// File name of the seed copied on first access.
    pub fn seed_file_name(self) -> &'static str {
        match self {
            Self::Lost => LOST_SEED_FILE,
            Self::Found => FOUND_SEED_FILE,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category label is neither `lost` nor `found`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(pub String);

impl Display for CategoryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown category `{}`; expected lost|found", self.0)
    }
}

impl Error for CategoryParseError {}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            other => Err(CategoryParseError(other.to_string())),
        }
    }
}
