//! Item domain model.
//!
//! # Responsibility
//! - Define the persisted lost/found record and its add-form draft.
//! - Own the JSON wire field names.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - Text fields are free-form and never validated.
//! - An absent `image_data` is omitted from persisted JSON.

use crate::model::image::{decode_image, ImageDecodeError};
use serde::{Deserialize, Serialize};

/// Item identifier. Millisecond timestamps in practice.
pub type ItemId = i64;

/// One lost or found record.
///
/// Legacy snake-case names (`item_name`, `found_date`, ...) are accepted on
/// read so collections written by older builds still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(default, alias = "item_name")]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    /// Free text, e.g. `2024-03-01` or `last Tuesday`.
    #[serde(default, alias = "found_date")]
    pub found_date: String,
    #[serde(default, alias = "found_location")]
    pub found_location: String,
    #[serde(default, alias = "found_by")]
    pub found_by: String,
    #[serde(default, alias = "contact_email")]
    pub contact_email: String,
    #[serde(default, alias = "contact_phone")]
    pub contact_phone: String,
    /// Base64 photo payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

/// Add-item form input: every item field except the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub color: String,
    pub description: String,
    pub found_date: String,
    pub found_location: String,
    pub found_by: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub image_data: Option<String>,
}

impl ItemDraft {
    /// Creates a draft with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Item {
    /// Builds a record from form input and a freshly issued id.
    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            color: draft.color,
            description: draft.description,
            found_date: draft.found_date,
            found_location: draft.found_location,
            found_by: draft.found_by,
            contact_email: draft.contact_email,
            contact_phone: draft.contact_phone,
            image_data: draft.image_data,
        }
    }

    /// Returns whether a non-blank photo payload is attached.
    pub fn has_image(&self) -> bool {
        self.image_data
            .as_deref()
            .is_some_and(|payload| !payload.trim().is_empty())
    }

    /// Decodes the attached photo into raw bytes.
    ///
    /// Returns `Ok(None)` when no photo is attached.
    pub fn image_bytes(&self) -> Result<Option<Vec<u8>>, ImageDecodeError> {
        match self.image_data.as_deref() {
            Some(payload) => decode_image(payload),
            None => Ok(None),
        }
    }
}
