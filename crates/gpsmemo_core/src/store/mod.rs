//! Blob store capability and best-effort collection persistence.
//!
//! # Responsibility
//! - Define the byte-oriented key-value contract the catalog persists into.
//! - Provide in-memory and SQLite-backed implementations.
//! - Serialize whole collections with best-effort semantics.
//!
//! # Invariants
//! - `CollectionStore::load` never fails; unreadable data is an empty list.
//! - `CollectionStore::save` never fails; a skipped write is only logged.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection;
pub mod memory;
pub mod sqlite;

pub use collection::{CollectionStore, SaveOutcome};
pub use memory::InMemoryBlobStore;
pub use sqlite::SqliteBlobStore;

/// Storage key of the memo collection.
pub const DEFAULT_MEMOS_KEY: &str = "savedMemos";
/// Storage key of the category collection.
pub const DEFAULT_CATEGORIES_KEY: &str = "savedCategories";

pub type BlobResult<T> = Result<T, BlobError>;

/// Failure reported by a blob store backend.
#[derive(Debug)]
pub enum BlobError {
    Sqlite(rusqlite::Error),
    /// The database was written by a newer build with a later schema.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// A shared in-memory map was poisoned by a panicking writer.
    Poisoned,
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "blob store schema version {found} is newer than supported {supported}"
            ),
            Self::Poisoned => write!(f, "blob store lock poisoned"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Poisoned => None,
        }
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Opaque byte-oriented key-value substrate.
pub trait BlobStore {
    /// Reads the value stored under `key`, `None` when never written.
    fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>>;
    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, bytes: &[u8]) -> BlobResult<()>;
}

impl<B: BlobStore + ?Sized> BlobStore for &B {
    fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, bytes: &[u8]) -> BlobResult<()> {
        (**self).set(key, bytes)
    }
}

/// Key names under which the catalog persists its two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    pub memos: String,
    pub categories: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            memos: DEFAULT_MEMOS_KEY.to_string(),
            categories: DEFAULT_CATEGORIES_KEY.to_string(),
        }
    }
}
