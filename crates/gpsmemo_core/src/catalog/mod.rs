//! In-memory memo/category catalog.
//!
//! # Responsibility
//! - Own the authoritative memo and category collections.
//! - Enforce the memo → category soft reference by cascade-clear on delete.
//! - Persist the affected collection(s) after every mutating call.
//!
//! # Invariants
//! - Memo insertion order is display order and survives persistence.
//! - After `delete_category` returns, no memo references the deleted id.
//! - Persistence and location failures never surface to callers.

use crate::model::category::Category;
use crate::model::memo::MemoId;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod events;
mod note_catalog;
mod order;
mod text;

pub use events::{CatalogChange, CatalogSnapshot, CHANGE_BUFFER};
pub use note_catalog::NoteCatalog;
pub use text::first_line;

/// Signals returned by catalog operations that address one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    MemoNotFound(MemoId),
    /// An index into the visible memo or category list is out of range.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoNotFound(id) => write!(f, "memo not found: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for list of length {len}")
            }
        }
    }
}

impl Error for CatalogError {}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Effect of an upsert call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Appended at the end of the collection.
    Inserted,
    /// Replaced the entry with the same id, keeping its position.
    Replaced,
    /// Rejected because the memo text is blank; nothing changed.
    SkippedEmpty,
}

/// Result of deleting one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDeletion {
    /// Removed category, `None` when the id was unknown.
    pub category: Option<Category>,
    /// Number of memos whose category reference was cleared.
    pub cleared_memos: usize,
}
