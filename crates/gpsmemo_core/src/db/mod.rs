//! SQLite bootstrap for `SqliteBlobStore`.
//!
//! Connections come back configured and migrated; failures use the
//! blob-store error vocabulary (`BlobError::Sqlite`,
//! `BlobError::UnsupportedSchemaVersion`).

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
