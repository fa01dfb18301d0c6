//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the catalog's memo/category/location operations to Dart via FRB.
//! - Own the single process-wide `NoteCatalog` instance.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - IDs cross the boundary as hyphenated UUID strings.
//! - Location events are applied on the caller's thread under the catalog lock.

use gpsmemo_core::{
    core_version as core_version_inner, first_line, init_logging as init_logging_inner,
    ping as ping_inner, BlobResult, BlobStore, Category, Coordinate,
    InMemoryBlobStore, LocationError, LocationEvent, Memo, NoteCatalog, SqliteBlobStore,
    UpsertOutcome,
};
use log::error;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use uuid::Uuid;

const DEFAULTS_DB_FILE_NAME: &str = "gpsmemo_defaults.sqlite3";
static CATALOG: OnceLock<Mutex<NoteCatalog<SessionStore>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
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
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Memo row projection for list and editor screens.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoItem {
    pub id: String,
    pub text: String,
    /// First line of `text`, used as the row title.
    pub title: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category_id: Option<String>,
    /// `None` when uncategorized.
    pub category_name: Option<String>,
}

/// Category row projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
}

/// Latest known device position and reverse-geocoded address.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationStatus {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected memo/category ID.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Lists memos in display order, optionally filtered by category.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_list(category_id: Option<String>) -> Vec<MemoItem> {
    let filter = match parse_optional_id(category_id.as_deref()) {
        Ok(filter) => filter,
        Err(_) => return Vec::new(),
    };
    let catalog = lock_catalog();
    catalog
        .filtered_memos(filter)
        .into_iter()
        .map(|memo| to_memo_item(&catalog, memo))
        .collect()
}

/// Creates (`id=None`) or updates one memo.
///
/// # FFI contract
/// - Blank text is rejected with `ok=false` and nothing is stored.
/// - The current location is stamped once, on the first save.
/// - An existing memo keeps its location on update.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_save(id: Option<String>, text: String, category_id: Option<String>) -> ActionResponse {
    let (memo_id, category_id) = match (
        parse_optional_id(id.as_deref()),
        parse_optional_id(category_id.as_deref()),
    ) {
        (Ok(memo_id), Ok(category_id)) => (memo_id, category_id),
        (Err(err), _) | (_, Err(err)) => return ActionResponse::failure(err),
    };

    let mut catalog = lock_catalog();
    let mut memo = match memo_id {
        Some(memo_id) => catalog
            .memo(memo_id)
            .cloned()
            .unwrap_or_else(|| Memo::with_id(memo_id, String::new())),
        None => Memo::new(String::new()),
    };
    memo.text = text;
    memo.category_id = category_id;
    catalog.prepare_memo(&mut memo);

    let saved_id = memo.id.to_string();
    match catalog.upsert_memo(memo) {
        UpsertOutcome::Inserted => ActionResponse::success("Memo created.", Some(saved_id)),
        UpsertOutcome::Replaced => ActionResponse::success("Memo updated.", Some(saved_id)),
        UpsertOutcome::SkippedEmpty => {
            ActionResponse::failure("Please enter some text before saving.")
        }
    }
}

/// Deletes one memo by id.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_delete(id: String) -> ActionResponse {
    let memo_id = match parse_id(&id) {
        Ok(memo_id) => memo_id,
        Err(err) => return ActionResponse::failure(err),
    };
    match lock_catalog().delete_memo(memo_id) {
        Ok(_) => ActionResponse::success("Memo deleted.", Some(id)),
        Err(err) => ActionResponse::failure(format!("memo_delete failed: {err}")),
    }
}

/// Moves one memo of the visible (selection-filtered) list.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_reorder(from_index: u32, to_index: u32) -> ActionResponse {
    match lock_catalog().reorder_memos(from_index as usize, to_index as usize) {
        Ok(()) => ActionResponse::success("Memos reordered.", None),
        Err(err) => ActionResponse::failure(format!("memo_reorder failed: {err}")),
    }
}

/// Sets (or clears with `None`) the list filter used by `memo_reorder`.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_select_category(category_id: Option<String>) -> ActionResponse {
    match parse_optional_id(category_id.as_deref()) {
        Ok(filter) => {
            lock_catalog().select_category(filter);
            ActionResponse::success("Filter updated.", category_id)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Lists categories in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn category_list() -> Vec<CategoryItem> {
    lock_catalog()
        .categories()
        .iter()
        .map(|category| CategoryItem {
            id: category.id.to_string(),
            name: category.name.clone(),
        })
        .collect()
}

/// Creates (`id=None`) or renames one category.
///
/// # FFI contract
/// - Empty names are rejected here, at the UI boundary.
#[flutter_rust_bridge::frb(sync)]
pub fn category_save(id: Option<String>, name: String) -> ActionResponse {
    let category_id = match parse_optional_id(id.as_deref()) {
        Ok(category_id) => category_id,
        Err(err) => return ActionResponse::failure(err),
    };
    if name.trim().is_empty() {
        return ActionResponse::failure("Category name must not be empty.");
    }

    let category = match category_id {
        Some(category_id) => Category::with_id(category_id, name),
        None => Category::new(name),
    };
    let saved_id = category.id.to_string();
    match lock_catalog().upsert_category(category) {
        UpsertOutcome::Replaced => ActionResponse::success("Category updated.", Some(saved_id)),
        _ => ActionResponse::success("Category created.", Some(saved_id)),
    }
}

/// Deletes one category and detaches it from every memo.
#[flutter_rust_bridge::frb(sync)]
pub fn category_delete(id: String) -> ActionResponse {
    let category_id = match parse_id(&id) {
        Ok(category_id) => category_id,
        Err(err) => return ActionResponse::failure(err),
    };
    let deletion = lock_catalog().delete_category(category_id);
    match deletion.category {
        Some(_) => ActionResponse::success(
            format!(
                "Category deleted; {} memo(s) uncategorized.",
                deletion.cleared_memos
            ),
            Some(id),
        ),
        None => ActionResponse::failure(format!("category not found: {id}")),
    }
}

/// Feeds one device position from the host location service.
#[flutter_rust_bridge::frb(sync)]
pub fn location_update(latitude: f64, longitude: f64) {
    let mut catalog = lock_catalog();
    catalog
        .location_sink()
        .position(Coordinate::new(latitude, longitude));
    catalog.pump_location_events();
}

/// Delivers a host reverse-geocode result for a previously fed position.
///
/// `address=None` reports a failed lookup.
#[flutter_rust_bridge::frb(sync)]
pub fn location_address(latitude: f64, longitude: f64, address: Option<String>) {
    let mut catalog = lock_catalog();
    catalog.location_sink().post(LocationEvent::Address {
        coordinate: Coordinate::new(latitude, longitude),
        result: address.ok_or_else(|| LocationError::Geocode("host lookup failed".to_string())),
    });
    catalog.pump_location_events();
}

/// Returns the latest position/address known to the catalog.
#[flutter_rust_bridge::frb(sync)]
pub fn location_status() -> LocationStatus {
    let catalog = lock_catalog();
    let location = catalog.current_location();
    LocationStatus {
        latitude: location.map(|c| c.latitude),
        longitude: location.map(|c| c.longitude),
        address: catalog.current_address().map(str::to_string),
    }
}

/// Blob store of the FFI session: the SQLite file, or memory when the file
/// cannot be opened.
enum SessionStore {
    Sqlite(SqliteBlobStore),
    Memory(InMemoryBlobStore),
}

impl BlobStore for SessionStore {
    fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        match self {
            Self::Sqlite(store) => store.get(key),
            Self::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, bytes: &[u8]) -> BlobResult<()> {
        match self {
            Self::Sqlite(store) => store.set(key, bytes),
            Self::Memory(store) => store.set(key, bytes),
        }
    }
}

fn lock_catalog() -> MutexGuard<'static, NoteCatalog<SessionStore>> {
    let catalog = CATALOG.get_or_init(|| Mutex::new(NoteCatalog::open(open_session_store())));
    let mut guard = catalog
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.pump_location_events();
    guard
}

fn open_session_store() -> SessionStore {
    let db_path = resolve_db_path();
    match SqliteBlobStore::open(&db_path) {
        Ok(store) => SessionStore::Sqlite(store),
        Err(err) => {
            error!(
                "event=session_open module=ffi status=degraded mode=memory path={} error={err}",
                db_path.display()
            );
            SessionStore::Memory(InMemoryBlobStore::new())
        }
    }
}

fn resolve_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var("GPSMEMO_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULTS_DB_FILE_NAME)
}

fn parse_id(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid id `{value}`"))
}

fn parse_optional_id(value: Option<&str>) -> Result<Option<Uuid>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_id(raw).map(Some),
    }
}

fn to_memo_item(catalog: &NoteCatalog<SessionStore>, memo: &Memo) -> MemoItem {
    MemoItem {
        id: memo.id.to_string(),
        text: memo.text.clone(),
        title: first_line(&memo.text).to_string(),
        latitude: memo.location.map(|c| c.latitude),
        longitude: memo.location.map(|c| c.longitude),
        category_id: memo.category_id.map(|id| id.to_string()),
        category_name: catalog.category_name(memo).map(str::to_string),
    }
}
