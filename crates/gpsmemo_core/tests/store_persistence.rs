use gpsmemo_core::{
    BlobError, BlobResult, BlobStore, Category, CollectionStore, Coordinate, InMemoryBlobStore,
    Memo, NoteCatalog, SaveOutcome, SqliteBlobStore,
};

struct FailingBlobStore;

impl BlobStore for FailingBlobStore {
    fn get(&self, _key: &str) -> BlobResult<Option<Vec<u8>>> {
        Err(BlobError::Poisoned)
    }

    fn set(&self, _key: &str, _bytes: &[u8]) -> BlobResult<()> {
        Err(BlobError::Poisoned)
    }
}

#[test]
fn save_then_load_roundtrips_memos() {
    let store = CollectionStore::new(InMemoryBlobStore::new());
    let category = Category::new("Errands");
    let mut geotagged = Memo::new("Buy milk\nskim").in_category(category.id);
    geotagged.stamp_location(Coordinate::new(-33.8688, 151.2093));
    let memos = vec![geotagged, Memo::new("Call mom")];

    assert!(matches!(
        store.save("savedMemos", &memos),
        SaveOutcome::Written { .. }
    ));
    assert_eq!(store.load::<Memo>("savedMemos"), memos);
}

#[test]
fn save_then_load_roundtrips_categories() {
    let store = CollectionStore::new(InMemoryBlobStore::new());
    let categories = vec![Category::new("Work"), Category::new("Home")];

    store.save("savedCategories", &categories);
    assert_eq!(store.load::<Category>("savedCategories"), categories);
}

#[test]
fn load_of_never_written_key_is_empty() {
    let store = CollectionStore::new(InMemoryBlobStore::new());
    assert!(store.load::<Memo>("savedMemos").is_empty());
}

#[test]
fn load_of_corrupted_bytes_is_empty() {
    let blobs = InMemoryBlobStore::new();
    blobs.set("savedMemos", &[0xff, 0x00, 0x7b]).unwrap();
    blobs.set("savedCategories", br#"{"not":"a list"}"#).unwrap();
    let store = CollectionStore::new(blobs);

    assert!(store.load::<Memo>("savedMemos").is_empty());
    assert!(store.load::<Category>("savedCategories").is_empty());
}

#[test]
fn backend_failures_are_swallowed() {
    let store = CollectionStore::new(FailingBlobStore);

    assert_eq!(store.save("savedMemos", &[Memo::new("x")]), SaveOutcome::Skipped);
    assert!(store.load::<Memo>("savedMemos").is_empty());
}

#[test]
fn catalog_keeps_in_memory_state_when_persistence_fails() {
    let mut catalog = NoteCatalog::open(FailingBlobStore);
    assert!(catalog.memos().is_empty());

    let memo = Memo::new("still here");
    catalog.upsert_memo(memo.clone());
    assert_eq!(catalog.memos(), &[memo]);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("defaults.sqlite3");
    let memo = Memo::new("persisted across launches");
    let category = Category::new("Travel");

    {
        let mut catalog = NoteCatalog::open(SqliteBlobStore::open(&path).unwrap());
        catalog.upsert_category(category.clone());
        catalog.upsert_memo(memo.clone().in_category(category.id));
    }

    let reopened = NoteCatalog::open(SqliteBlobStore::open(&path).unwrap());
    assert_eq!(reopened.categories(), &[category.clone()]);
    assert_eq!(reopened.memos().len(), 1);
    assert_eq!(reopened.memos()[0].id, memo.id);
    assert_eq!(reopened.memos()[0].category_id, Some(category.id));
    assert_eq!(
        reopened.blobs().keys().unwrap(),
        vec!["savedCategories".to_string(), "savedMemos".to_string()]
    );
}
