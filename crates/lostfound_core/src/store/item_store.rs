//! Item store: per-category snapshots, seeding, append and name filter.
//!
//! # Responsibility
//! - Load each category from persisted storage, seeding it on first run.
//! - Append new items and queue full-collection writes.
//! - Hold the search text and derive filtered views.
//!
//! # Invariants
//! - Categories never share a snapshot.
//! - Snapshot order is persisted order followed by append order.
//! - Read/parse failures yield an empty snapshot, never an error.
//! - A category whose bootstrap failed stays unloaded so the next load
//!   retries the seed copy.
//! - Items added to an unloaded category are held in memory, never written,
//!   until a load bootstraps it; they are then appended and persisted.
//! - Loading waits for queued writes, so it never reads a collection older
//!   than the in-memory state that produced it.

use crate::config::{CatalogConfig, PersistMode};
use crate::model::category::Category;
use crate::model::item::{Item, ItemDraft, ItemId};
use crate::repo::item_repo::{ItemRepository, JsonFileItemRepository, RepoError};
use crate::repo::seed::{ensure_seeded, SeedSource};
use crate::search::filter::filter_by_name;
use crate::store::ids::IdGenerator;
use crate::store::persist_worker::{PersistError, PersistOutcome, PersistTicket, PersistWorker};
use crate::store::StoreError;
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Store over the lost and found collections.
pub struct ItemStore {
    repo: Arc<dyn ItemRepository>,
    seeds: Arc<dyn SeedSource>,
    worker: PersistWorker,
    persist_mode: PersistMode,
    snapshots: BTreeMap<Category, Vec<Item>>,
    held: BTreeMap<Category, Vec<Item>>,
    search_query: String,
    ids: IdGenerator,
}

impl ItemStore {
    /// Opens a file-backed store described by `config`.
    ///
    /// # Errors
    /// - Returns `StoreError::Config` for an invalid configuration.
    /// - Returns `StoreError::Persist` when the writer thread cannot start.
    pub fn open(config: &CatalogConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let repo: Arc<dyn ItemRepository> =
            Arc::new(JsonFileItemRepository::new(config.data_dir.clone()));
        Self::with_parts(
            repo,
            config.seed_source(),
            config.persist_mode,
            config.verify_after_save,
        )
    }

    /// Builds a store over explicit repository and seed implementations.
    pub fn with_parts(
        repo: Arc<dyn ItemRepository>,
        seeds: Arc<dyn SeedSource>,
        persist_mode: PersistMode,
        verify_after_save: bool,
    ) -> Result<Self, StoreError> {
        let worker = PersistWorker::spawn(repo.clone(), verify_after_save)?;
        Ok(Self {
            repo,
            seeds,
            worker,
            persist_mode,
            snapshots: BTreeMap::new(),
            held: BTreeMap::new(),
            search_query: String::new(),
            ids: IdGenerator::system(),
        })
    }

    /// Replaces the id source.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Loads `category` from persisted storage and returns the new snapshot.
    ///
    /// Copies the category seed first when no collection exists yet.
    pub fn load(&mut self, category: Category) -> &[Item] {
        let started_at = Instant::now();
        if let Err(err) = self.worker.flush() {
            warn!(
                "event=store_load module=store status=warn category={} error_code=flush_failed error={}",
                category, err
            );
        }

        let bootstrapped =
            ensure_seeded(self.repo.as_ref(), self.seeds.as_ref(), category).is_ok();

        let items = match self.repo.read_items(category) {
            Ok(items) => {
                info!(
                    "event=store_load module=store status=ok category={} count={} duration_ms={}",
                    category,
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                items
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error category={} error_code={} error={}",
                    category,
                    load_error_code(&err),
                    err
                );
                Vec::new()
            }
        };

        if bootstrapped {
            let mut items = items;
            if let Some(held) = self.held.remove(&category) {
                info!(
                    "event=store_load module=store status=ok category={} held_count={}",
                    category,
                    held.len()
                );
                items.extend(held);
                drop(self.persist(category, items.clone()));
            }
            self.snapshots.insert(category, items);
        } else {
            self.snapshots.remove(&category);
        }
        self.snapshot(category)
    }

    /// Appends `item` to `category` and queues a write of the full snapshot.
    ///
    /// Loads the category first when it was never loaded, so the write never
    /// replaces an existing collection with a partial one.
    pub fn add(&mut self, category: Category, item: Item) -> PersistTicket {
        self.ensure_loaded(category);
        self.push(category, item)
    }

    /// Builds an item from form input with a fresh id and appends it.
    pub fn add_draft(&mut self, category: Category, draft: ItemDraft) -> (Item, PersistTicket) {
        self.ensure_loaded(category);
        let item = Item::from_draft(self.next_id(category), draft);
        let ticket = self.push(category, item.clone());
        (item, ticket)
    }

    /// Issues an id unique within the current `category` snapshot.
    pub fn next_id(&mut self, category: Category) -> ItemId {
        let floor = self
            .snapshot(category)
            .iter()
            .map(|item| item.id)
            .max()
            .unwrap_or(0);
        self.ids.next_id(floor)
    }

    /// Replaces the search text. Does not touch storage.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Returns the `category` snapshot filtered by the current search text.
    pub fn filtered_view(&self, category: Category) -> Vec<Item> {
        filter_by_name(self.snapshot(category), &self.search_query)
    }

    /// Returns the current in-memory snapshot.
    ///
    /// For a category that is not loaded this is the list of held items.
    pub fn snapshot(&self, category: Category) -> &[Item] {
        self.snapshots
            .get(&category)
            .or_else(|| self.held.get(&category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns whether `category` has a loaded snapshot.
    pub fn is_loaded(&self, category: Category) -> bool {
        self.snapshots.contains_key(&category)
    }

    /// Blocks until every queued write has finished.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.worker.flush()
    }

    fn ensure_loaded(&mut self, category: Category) {
        if !self.is_loaded(category) {
            self.load(category);
        }
    }

    fn push(&mut self, category: Category, item: Item) -> PersistTicket {
        if !self.is_loaded(category) {
            return self.hold(category, item);
        }

        let snapshot = self.snapshots.entry(category).or_default();
        if snapshot.iter().any(|existing| existing.id == item.id) {
            warn!(
                "event=store_add module=store status=warn category={} id={} error_code=duplicate_id",
                category, item.id
            );
        }
        let item_id = item.id;
        snapshot.push(item);
        let count = snapshot.len();
        let items = snapshot.clone();
        info!(
            "event=store_add module=store status=ok category={} id={} count={}",
            category, item_id, count
        );
        self.persist(category, items)
    }

    /// Keeps `item` in memory only; writing now would create a collection
    /// that masks the seed on every later load.
    fn hold(&mut self, category: Category, item: Item) -> PersistTicket {
        let item_id = item.id;
        let held = self.held.entry(category).or_default();
        held.push(item);
        warn!(
            "event=store_add module=store status=warn category={} id={} held_count={} error_code=not_bootstrapped",
            category,
            item_id,
            held.len()
        );
        PersistTicket::ready(PersistOutcome::Failed {
            category,
            error: format!(
                "{} is not bootstrapped; item held in memory until the next successful load",
                category.items_file_name()
            ),
        })
    }

    fn persist(&self, category: Category, items: Vec<Item>) -> PersistTicket {
        let ticket = self.worker.submit(category, items);
        match self.persist_mode {
            PersistMode::FireAndForget => ticket,
            PersistMode::Blocking => {
                let outcome = ticket.wait().unwrap_or_else(|err| PersistOutcome::Failed {
                    category,
                    error: err.to_string(),
                });
                PersistTicket::ready(outcome)
            }
        }
    }
}

fn load_error_code(err: &RepoError) -> &'static str {
    match err {
        _ if err.is_not_found() => "collection_missing",
        RepoError::Malformed { .. } => "parse_failed",
        RepoError::Io { .. } | RepoError::Encode(_) => "read_failed",
    }
}
