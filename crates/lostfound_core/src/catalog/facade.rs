//! Catalog facade: the one object the presentation layer talks to.
//!
//! # Responsibility
//! - Forward load/add/search calls to the item store.
//! - Publish the active snapshot and search text as observable values.
//!
//! # Invariants
//! - Every mutating call notifies the matching observers.
//! - `items` always mirrors the store snapshot of the active category.
//! - No business rules live here beyond delegation.

use crate::catalog::observable::{Observable, SubscriptionId};
use crate::config::CatalogConfig;
use crate::model::category::Category;
use crate::model::item::{Item, ItemDraft};
use crate::store::item_store::ItemStore;
use crate::store::persist_worker::{PersistError, PersistTicket};
use crate::store::StoreError;
use log::info;

/// Process-wide catalog state, constructed once by the host and passed by
/// reference to each consumer.
pub struct CatalogFacade {
    store: ItemStore,
    items: Observable<Vec<Item>>,
    search_query: Observable<String>,
    active_category: Option<Category>,
}

impl CatalogFacade {
    /// Opens the file-backed store described by `config`.
    ///
    /// # Errors
    /// - Returns `StoreError` when the configuration is invalid or the
    ///   persistence worker cannot start.
    pub fn open(config: CatalogConfig) -> Result<Self, StoreError> {
        let store = ItemStore::open(&config)?;
        info!(
            "event=catalog_open module=catalog status=ok data_dir={} persist_mode={:?}",
            config.data_dir.display(),
            config.persist_mode
        );
        Ok(Self::from_store(store))
    }

    /// Wraps an already constructed store. State starts empty.
    pub fn from_store(store: ItemStore) -> Self {
        Self {
            store,
            items: Observable::default(),
            search_query: Observable::default(),
            active_category: None,
        }
    }

    /// Loads `category`, makes it active and publishes its snapshot.
    pub fn load(&mut self, category: Category) -> Vec<Item> {
        let snapshot = self.store.load(category).to_vec();
        self.active_category = Some(category);
        self.items.set(snapshot.clone());
        snapshot
    }

    /// Adds a new item built from form input.
    ///
    /// The returned ticket may be dropped (fire-and-forget) or waited on.
    pub fn add(&mut self, category: Category, draft: ItemDraft) -> (Item, PersistTicket) {
        let (item, ticket) = self.store.add_draft(category, draft);
        if self.active_category.is_none() {
            self.active_category = Some(category);
        }
        if self.active_category == Some(category) {
            self.items.set(self.store.snapshot(category).to_vec());
        }
        (item, ticket)
    }

    /// Replaces the search text and notifies search observers.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.store.set_search_query(text.clone());
        self.search_query.set(text);
    }

    /// Cleanup hook for when the catalog view closes or is backgrounded.
    pub fn close_view(&mut self) {
        self.set_search_query(String::new());
    }

    pub fn search_query(&self) -> &str {
        self.search_query.get()
    }

    /// Snapshot of the active category as last published.
    pub fn items(&self) -> &[Item] {
        self.items.get()
    }

    pub fn active_category(&self) -> Option<Category> {
        self.active_category
    }

    /// Returns `category` filtered by the current search text.
    pub fn filtered_view(&self, category: Category) -> Vec<Item> {
        self.store.filtered_view(category)
    }

    /// Returns the active category filtered by the current search text.
    pub fn visible_items(&self) -> Vec<Item> {
        match self.active_category {
            Some(category) => self.filtered_view(category),
            None => Vec::new(),
        }
    }

    pub fn subscribe_items(
        &mut self,
        callback: impl Fn(&Vec<Item>) + Send + 'static,
    ) -> SubscriptionId {
        self.items.subscribe(callback)
    }

    pub fn unsubscribe_items(&mut self, id: SubscriptionId) -> bool {
        self.items.unsubscribe(id)
    }

    pub fn subscribe_search_query(
        &mut self,
        callback: impl Fn(&String) + Send + 'static,
    ) -> SubscriptionId {
        self.search_query.subscribe(callback)
    }

    pub fn unsubscribe_search_query(&mut self, id: SubscriptionId) -> bool {
        self.search_query.unsubscribe(id)
    }

    /// Blocks until every queued write has finished.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.store.flush()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }
}
