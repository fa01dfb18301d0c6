//! Domain model for memos and categories.
//!
//! # Responsibility
//! - Define the records owned by the catalog and persisted by the store.
//! - Keep the persisted JSON shape stable across releases.
//!
//! # Invariants
//! - Every memo and category is identified by a stable UUID.
//! - A memo references at most one category, by id only.

pub mod category;
pub mod coordinate;
pub mod memo;
