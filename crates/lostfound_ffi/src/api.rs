//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose catalog use-cases to Dart via FRB over an opaque handle.
//! - Flatten core results into simple response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The handle is created once by the host app and passed to every call.
//! - Category labels are `lost` or `found`; anything else is reported in
//!   the response message.

use log::warn;
use lostfound_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, CatalogConfig,
    CatalogFacade, Category, Item, ItemDraft, PersistOutcome,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Opaque catalog state owned by the Dart side.
#[flutter_rust_bridge::frb(opaque)]
pub struct CatalogHandle {
    catalog: Mutex<CatalogFacade>,
}

impl CatalogHandle {
    fn lock(&self) -> MutexGuard<'_, CatalogFacade> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Item as rendered by list and detail screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub description: String,
    pub found_date: String,
    pub found_location: String,
    pub found_by: String,
    pub contact_email: String,
    pub contact_phone: String,
    /// Base64 photo payload, if any.
    pub image_data: Option<String>,
}

/// Add-item form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInput {
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

/// Response envelope for `catalog_open`.
pub struct CatalogOpenResponse {
    /// Present on success.
    pub handle: Option<CatalogHandle>,
    pub message: String,
}

/// Response envelope for list-returning calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListResponse {
    pub ok: bool,
    pub items: Vec<ItemView>,
    pub message: String,
}

/// Response envelope for the add-item flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionResponse {
    pub ok: bool,
    /// Id assigned to the new item.
    pub item_id: Option<i64>,
    pub message: String,
}

impl ItemListResponse {
    fn success(items: Vec<Item>) -> Self {
        let message = if items.is_empty() {
            "No items.".to_string()
        } else {
            format!("{} item(s).", items.len())
        };
        Self {
            ok: true,
            items: items.into_iter().map(ItemView::from).collect(),
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

impl ItemActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            color: item.color,
            description: item.description,
            found_date: item.found_date,
            found_location: item.found_location,
            found_by: item.found_by,
            contact_email: item.contact_email,
            contact_phone: item.contact_phone,
            image_data: item.image_data,
        }
    }
}

impl From<ItemInput> for ItemDraft {
    fn from(input: ItemInput) -> Self {
        Self {
            name: input.name,
            color: input.color,
            description: input.description,
            found_date: input.found_date,
            found_location: input.found_location,
            found_by: input.found_by,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            image_data: input.image_data.filter(|payload| !payload.trim().is_empty()),
        }
    }
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the catalog rooted at the app's private data directory.
///
/// `seed_dir` points at unpacked `mock-*.json` assets; `None` uses the seeds
/// bundled into the core library.
///
/// # FFI contract
/// - Sync call; starts the background save worker.
/// - Call once at app start and keep the handle for the app lifetime.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_open(data_dir: String, seed_dir: Option<String>) -> CatalogOpenResponse {
    let mut config = CatalogConfig::new(data_dir.trim());
    if let Some(dir) = seed_dir.as_deref().map(str::trim).filter(|dir| !dir.is_empty()) {
        config = config.with_seed_dir(dir);
    }

    match CatalogFacade::open(config) {
        Ok(catalog) => CatalogOpenResponse {
            handle: Some(CatalogHandle {
                catalog: Mutex::new(catalog),
            }),
            message: "Catalog opened.".to_string(),
        },
        Err(err) => CatalogOpenResponse {
            handle: None,
            message: format!("catalog_open failed: {err}"),
        },
    }
}

/// Loads one category (seeding it on first run) and makes it active.
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Storage failures degrade to an empty list; only bad category labels
///   produce `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_load(handle: &CatalogHandle, category: String) -> ItemListResponse {
    match parse_category(&category) {
        Ok(category) => ItemListResponse::success(handle.lock().load(category)),
        Err(message) => ItemListResponse::failure(format!("catalog_load failed: {message}")),
    }
}

/// Adds one item from the add-item form.
///
/// # FFI contract
/// - Sync call; returns once the item is in memory.
/// - `wait_for_save = false` keeps fire-and-forget persistence.
/// - `wait_for_save = true` blocks until the file write finished and reports
///   a failed write through `ok = false` (the item stays in memory).
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_add(
    handle: &CatalogHandle,
    category: String,
    input: ItemInput,
    wait_for_save: bool,
) -> ItemActionResponse {
    let category = match parse_category(&category) {
        Ok(category) => category,
        Err(message) => {
            return ItemActionResponse::failure(format!("catalog_add failed: {message}"))
        }
    };

    let (item, ticket) = handle.lock().add(category, input.into());
    if !wait_for_save {
        return ItemActionResponse {
            ok: true,
            item_id: Some(item.id),
            message: "Item added.".to_string(),
        };
    }

    match ticket.wait() {
        Ok(PersistOutcome::Saved { .. }) => ItemActionResponse {
            ok: true,
            item_id: Some(item.id),
            message: "Item added and saved.".to_string(),
        },
        Ok(PersistOutcome::Failed { error, .. }) => ItemActionResponse {
            ok: false,
            item_id: Some(item.id),
            message: format!("catalog_add save failed: {error}"),
        },
        Err(err) => ItemActionResponse {
            ok: false,
            item_id: Some(item.id),
            message: format!("catalog_add save failed: {err}"),
        },
    }
}

/// Replaces the search text; call on every keystroke.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_set_search_query(handle: &CatalogHandle, text: String) {
    handle.lock().set_search_query(text);
}

/// Returns one category filtered by the current search text.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_filtered_view(handle: &CatalogHandle, category: String) -> ItemListResponse {
    match parse_category(&category) {
        Ok(category) => ItemListResponse::success(handle.lock().filtered_view(category)),
        Err(message) => {
            ItemListResponse::failure(format!("catalog_filtered_view failed: {message}"))
        }
    }
}

/// Cleanup hook for when a listing screen is disposed.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_close_view(handle: &CatalogHandle) {
    handle.lock().close_view();
}

fn parse_category(label: &str) -> Result<Category, String> {
    label.parse::<Category>().map_err(|err| {
        warn!(
            "event=ffi_category module=ffi status=error error_code=unknown_category label_len={}",
            label.len()
        );
        err.to_string()
    })
}
