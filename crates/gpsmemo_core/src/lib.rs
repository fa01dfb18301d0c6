//! Core data management for gpsmemo.
//! This crate is the single source of truth for memo/category invariants.

pub mod catalog;
pub mod db;
pub mod location;
pub mod logging;
pub mod model;
pub mod store;

pub use catalog::{
    first_line, CatalogChange, CatalogError, CatalogResult, CatalogSnapshot, CategoryDeletion,
    NoteCatalog, UpsertOutcome, CHANGE_BUFFER,
};
pub use location::{
    location_channel, GeocodeReply, LocationCapability, LocationError, LocationEvent,
    LocationSink,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::coordinate::Coordinate;
pub use model::memo::{Memo, MemoId};
pub use store::{
    BlobError, BlobResult, BlobStore, CollectionStore, InMemoryBlobStore, SaveOutcome,
    SqliteBlobStore, StoreKeys,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
