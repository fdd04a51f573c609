use lostfound_core::{
    encode_image, BundledSeeds, CatalogConfig, Category, IdGenerator, Item, ItemDraft,
    ItemRepository, ItemStore, JsonFileItemRepository, PersistMode, PersistOutcome, RepoResult,
    SaveCheck, SeedError, SeedSource,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const WALLET_SEED: &str = "[\n  {\"id\": 1, \"name\": \"Wallet\", \"color\": \"Brown\",\n   \"foundLocation\": \"Library\"}\n]\n";
const BACKPACK_SEED: &str = "[{\"id\": 1, \"name\": \"Backpack\"}]";

struct Fixture {
    data: TempDir,
    seeds: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            data: tempfile::tempdir().unwrap(),
            seeds: tempfile::tempdir().unwrap(),
        };
        fixture.write_seed(Category::Found, WALLET_SEED);
        fixture.write_seed(Category::Lost, BACKPACK_SEED);
        fixture
    }

    fn without_seeds() -> Self {
        Self {
            data: tempfile::tempdir().unwrap(),
            seeds: tempfile::tempdir().unwrap(),
        }
    }

    fn write_seed(&self, category: Category, content: &str) {
        std::fs::write(self.seeds.path().join(category.seed_file_name()), content).unwrap();
    }

    fn items_path(&self, category: Category) -> std::path::PathBuf {
        self.data.path().join(category.items_file_name())
    }

    fn config(&self) -> CatalogConfig {
        CatalogConfig::new(self.data.path()).with_seed_dir(self.seeds.path())
    }

    fn store(&self) -> ItemStore {
        ItemStore::open(&self.config()).unwrap()
    }

    fn read_persisted(&self, category: Category) -> Vec<Item> {
        JsonFileItemRepository::new(self.data.path())
            .read_items(category)
            .unwrap()
    }
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn first_load_copies_seed_byte_for_byte() {
    let fixture = Fixture::new();
    let mut store = fixture.store();

    let loaded = store.load(Category::Found).to_vec();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, 1);
    assert_eq!(loaded[0].name, "Wallet");
    assert_eq!(loaded[0].found_location, "Library");
    assert_eq!(store.filtered_view(Category::Found), loaded);
    let persisted = std::fs::read_to_string(fixture.items_path(Category::Found)).unwrap();
    assert_eq!(persisted, WALLET_SEED);
}

#[test]
fn second_load_does_not_recopy_seed() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    store.load(Category::Found);

    fixture.write_seed(Category::Found, "[{\"id\": 2, \"name\": \"Changed\"}]");
    let reloaded = store.load(Category::Found).to_vec();

    assert_eq!(names(&reloaded), vec!["Wallet"]);
    let persisted = std::fs::read_to_string(fixture.items_path(Category::Found)).unwrap();
    assert_eq!(persisted, WALLET_SEED);
}

#[test]
fn existing_collection_is_never_replaced_by_seed() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.items_path(Category::Lost),
        "[{\"id\": 40, \"name\": \"Umbrella\"}]",
    )
    .unwrap();
    let mut store = fixture.store();

    assert_eq!(names(store.load(Category::Lost)), vec!["Umbrella"]);
}

#[test]
fn load_is_idempotent() {
    let fixture = Fixture::new();
    let mut store = fixture.store();

    let first = store.load(Category::Lost).to_vec();
    let second = store.load(Category::Lost).to_vec();

    assert_eq!(first, second);
}

#[test]
fn malformed_collection_yields_empty_snapshot() {
    let fixture = Fixture::new();
    std::fs::write(fixture.items_path(Category::Found), "{ not json").unwrap();
    let mut store = fixture.store();

    assert!(store.load(Category::Found).is_empty());
    assert!(store.is_loaded(Category::Found));
}

#[test]
fn missing_seed_leaves_category_unloaded_and_retries() {
    let fixture = Fixture::without_seeds();
    let mut store = fixture.store();

    assert!(store.load(Category::Lost).is_empty());
    assert!(!store.is_loaded(Category::Lost));
    assert!(!fixture.items_path(Category::Lost).exists());

    fixture.write_seed(Category::Lost, BACKPACK_SEED);
    assert_eq!(names(store.load(Category::Lost)), vec!["Backpack"]);
    assert!(store.is_loaded(Category::Lost));
}

#[test]
fn unreadable_collection_yields_empty_snapshot() {
    let fixture = Fixture::new();
    std::fs::write(fixture.items_path(Category::Found), [0xff, 0xfe, 0x00, 0x5b]).unwrap();
    let mut store = fixture.store();

    assert!(store.load(Category::Found).is_empty());
    assert!(store.is_loaded(Category::Found));
}

#[test]
fn unwritable_storage_keeps_category_unloaded() {
    let fixture = Fixture::new();
    let blocker = fixture.data.path().join("not-a-dir");
    std::fs::write(&blocker, "plain file").unwrap();
    let config = CatalogConfig::new(blocker.clone()).with_seed_dir(fixture.seeds.path());
    let mut store = ItemStore::open(&config).unwrap();

    assert!(store.load(Category::Found).is_empty());
    assert!(!store.is_loaded(Category::Found));

    let (keys, ticket) = store.add_draft(Category::Found, ItemDraft::named("Keys"));
    assert!(matches!(
        ticket.wait().unwrap(),
        PersistOutcome::Failed {
            category: Category::Found,
            ..
        }
    ));
    assert_eq!(store.snapshot(Category::Found), &[keys][..]);
    assert!(!store.is_loaded(Category::Found));
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "plain file");
}

#[test]
fn item_added_before_seed_is_available_joins_the_seeded_collection() {
    let fixture = Fixture::without_seeds();
    let mut store = fixture.store();
    store.load(Category::Lost);

    let (_keys, ticket) = store.add_draft(Category::Lost, ItemDraft::named("Keys"));
    assert!(!ticket.wait().unwrap().is_saved());
    assert_eq!(names(store.snapshot(Category::Lost)), vec!["Keys"]);
    assert!(!fixture.items_path(Category::Lost).exists());

    fixture.write_seed(Category::Lost, BACKPACK_SEED);
    assert_eq!(names(store.load(Category::Lost)), vec!["Backpack", "Keys"]);

    store.flush().unwrap();
    assert_eq!(
        names(&fixture.read_persisted(Category::Lost)),
        vec!["Backpack", "Keys"]
    );
}

#[derive(Default)]
struct UnavailableSeeds {
    attempts: AtomicUsize,
}

impl SeedSource for UnavailableSeeds {
    fn seed_bytes(&self, category: Category) -> Result<Vec<u8>, SeedError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SeedError::Missing {
            category,
            path: category.seed_file_name().into(),
        })
    }
}

#[test]
fn add_on_unbootstrapped_category_tries_the_seed_once() {
    let data = tempfile::tempdir().unwrap();
    let seeds = Arc::new(UnavailableSeeds::default());
    let mut store = ItemStore::with_parts(
        Arc::new(JsonFileItemRepository::new(data.path())),
        seeds.clone(),
        PersistMode::FireAndForget,
        true,
    )
    .unwrap();

    drop(store.add_draft(Category::Found, ItemDraft::named("Scarf")));
    assert_eq!(seeds.attempts.load(Ordering::SeqCst), 1);

    drop(store.add(Category::Found, Item::from_draft(7, ItemDraft::named("Cap"))));
    assert_eq!(seeds.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(names(store.snapshot(Category::Found)), vec!["Scarf", "Cap"]);
}

#[test]
fn bundled_seeds_bootstrap_both_categories() {
    let data = tempfile::tempdir().unwrap();
    let mut store = ItemStore::open(&CatalogConfig::new(data.path())).unwrap();

    assert!(!store.load(Category::Found).is_empty());
    assert!(!store.load(Category::Lost).is_empty());
    assert_eq!(
        std::fs::read(data.path().join("found-items.json")).unwrap(),
        include_bytes!("../assets/mock-found-items.json")
    );
    assert!(data.path().join("lost-items.json").is_file());
}

#[test]
fn adds_are_returned_in_append_order_with_their_ids() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    store.load(Category::Found);

    let mut added = Vec::new();
    for name in ["Phone", "Notebook", "Phone case"] {
        let (item, _ticket) = store.add_draft(Category::Found, ItemDraft::named(name));
        added.push(item);
    }

    let view = store.filtered_view(Category::Found);
    assert_eq!(
        names(&view),
        vec!["Wallet", "Phone", "Notebook", "Phone case"]
    );
    assert_eq!(&view[1..], added.as_slice());
    assert!(added.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert!(added.iter().all(|item| item.id > 1));

    store.flush().unwrap();
    assert_eq!(fixture.read_persisted(Category::Found), view);
}

#[test]
fn added_item_survives_reload() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    store.load(Category::Lost);

    let (keys, _ticket) = store.add_draft(Category::Lost, ItemDraft::named("Keys"));
    let reloaded = store.load(Category::Lost).to_vec();

    let found = reloaded.iter().find(|item| item.name == "Keys").unwrap();
    assert_eq!(found.id, keys.id);
    assert_eq!(reloaded.iter().filter(|item| item.id == keys.id).count(), 1);
}

#[test]
fn add_before_load_keeps_seeded_items() {
    let fixture = Fixture::new();
    let mut store = fixture.store();

    let ticket = store.add(Category::Found, Item::from_draft(99, ItemDraft::named("Hat")));
    assert!(ticket.wait().unwrap().is_saved());

    assert_eq!(
        names(&fixture.read_persisted(Category::Found)),
        vec!["Wallet", "Hat"]
    );
}

#[test]
fn categories_do_not_share_snapshots() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    store.load(Category::Found);
    store.load(Category::Lost);

    drop(store.add_draft(Category::Lost, ItemDraft::named("Bike lock")));

    assert_eq!(names(store.snapshot(Category::Found)), vec!["Wallet"]);
    assert_eq!(
        names(store.snapshot(Category::Lost)),
        vec!["Backpack", "Bike lock"]
    );
    store.flush().unwrap();
    assert_eq!(names(&fixture.read_persisted(Category::Found)), vec!["Wallet"]);
}

#[test]
fn search_query_filters_by_case_insensitive_name() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    store.load(Category::Found);
    store.load(Category::Lost);

    store.set_search_query("wal");
    assert_eq!(names(&store.filtered_view(Category::Found)), vec!["Wallet"]);
    assert!(store.filtered_view(Category::Lost).is_empty());

    store.set_search_query("");
    assert_eq!(names(&store.filtered_view(Category::Lost)), vec!["Backpack"]);
}

#[test]
fn set_search_query_does_not_touch_storage() {
    let fixture = Fixture::new();
    let mut store = fixture.store();

    store.set_search_query("anything");

    assert_eq!(store.search_query(), "anything");
    assert!(!fixture.items_path(Category::Found).exists());
    assert!(!fixture.items_path(Category::Lost).exists());
}

#[test]
fn fire_and_forget_ticket_reports_verified_save() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    store.load(Category::Found);

    let (_item, ticket) = store.add_draft(Category::Found, ItemDraft::named("Gloves"));

    assert_eq!(
        ticket.wait().unwrap(),
        PersistOutcome::Saved {
            category: Category::Found,
            count: 2,
            check: SaveCheck::Matched,
        }
    );
}

#[test]
fn blocking_mode_returns_resolved_ticket() {
    let fixture = Fixture::new();
    let config = fixture.config().with_persist_mode(PersistMode::Blocking);
    let mut store = ItemStore::open(&config).unwrap();
    store.load(Category::Lost);

    let (_item, ticket) = store.add_draft(Category::Lost, ItemDraft::named("Jacket"));

    let outcome = ticket.try_outcome().unwrap().unwrap();
    assert!(outcome.is_saved());
    assert_eq!(names(&fixture.read_persisted(Category::Lost)), vec!["Backpack", "Jacket"]);
}

#[test]
fn persisted_collection_round_trips_field_for_field() {
    let fixture = Fixture::new();
    let photo = encode_image(&[1, 2, 3, 4, 5]);
    let expected = {
        let mut store = fixture.store();
        store.load(Category::Found);
        let with_photo = ItemDraft {
            name: "Camera".to_string(),
            color: "Black".to_string(),
            description: "Compact camera, strap missing".to_string(),
            found_date: "2024-05-04".to_string(),
            found_location: "Park bench".to_string(),
            found_by: "Lee".to_string(),
            contact_email: "lee@example.com".to_string(),
            contact_phone: "555-0142".to_string(),
            image_data: Some(photo.clone()),
        };
        drop(store.add_draft(Category::Found, with_photo));
        drop(store.add_draft(Category::Found, ItemDraft::named("Sunglasses")));
        store.snapshot(Category::Found).to_vec()
    };

    let mut reopened = fixture.store();
    let reloaded = reopened.load(Category::Found).to_vec();

    assert_eq!(reloaded, expected);
    assert_eq!(reloaded[1].image_data.as_deref(), Some(photo.as_str()));
    assert_eq!(reloaded[2].image_data, None);
}

#[test]
fn ids_are_unique_even_when_the_clock_stands_still() {
    let fixture = Fixture::new();
    let mut store = fixture.store().with_id_generator(IdGenerator::with_clock(|| 1));
    store.load(Category::Found);

    let (first, _) = store.add_draft(Category::Found, ItemDraft::named("A"));
    let (second, _) = store.add_draft(Category::Found, ItemDraft::named("B"));

    assert_eq!(first.id, 2);
    assert_eq!(second.id, 3);
}

#[derive(Default)]
struct CountingRepo {
    inner: Option<JsonFileItemRepository>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingRepo {
    fn over(dir: &Path) -> Self {
        Self {
            inner: Some(JsonFileItemRepository::new(dir)),
            ..Self::default()
        }
    }

    fn repo(&self) -> &JsonFileItemRepository {
        self.inner.as_ref().unwrap()
    }
}

impl ItemRepository for CountingRepo {
    fn exists(&self, category: Category) -> bool {
        self.repo().exists(category)
    }

    fn read_items(&self, category: Category) -> RepoResult<Vec<Item>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.repo().read_items(category)
    }

    fn write_items(&self, category: Category, items: &[Item]) -> RepoResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.repo().write_items(category, items)
    }

    fn install_seed(&self, category: Category, seed: &[u8]) -> RepoResult<()> {
        self.repo().install_seed(category, seed)
    }
}

#[test]
fn each_save_is_followed_by_one_read_back() {
    let data = tempfile::tempdir().unwrap();
    let repo = Arc::new(CountingRepo::over(data.path()));
    let mut store = ItemStore::with_parts(
        repo.clone(),
        Arc::new(BundledSeeds),
        PersistMode::FireAndForget,
        true,
    )
    .unwrap();

    store.load(Category::Found);
    assert_eq!(repo.reads.load(Ordering::SeqCst), 1);

    let (_item, ticket) = store.add_draft(Category::Found, ItemDraft::named("Mug"));
    ticket.wait().unwrap();

    assert_eq!(repo.writes.load(Ordering::SeqCst), 1);
    assert_eq!(repo.reads.load(Ordering::SeqCst), 2);
}

#[test]
fn read_back_can_be_disabled() {
    let data = tempfile::tempdir().unwrap();
    let repo = Arc::new(CountingRepo::over(data.path()));
    let mut store = ItemStore::with_parts(
        repo.clone(),
        Arc::new(BundledSeeds),
        PersistMode::FireAndForget,
        false,
    )
    .unwrap();
    store.load(Category::Lost);

    let (_item, ticket) = store.add_draft(Category::Lost, ItemDraft::named("Mug"));
    let outcome = ticket.wait().unwrap();

    assert!(matches!(
        outcome,
        PersistOutcome::Saved {
            check: SaveCheck::Skipped,
            ..
        }
    ));
    assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
}
