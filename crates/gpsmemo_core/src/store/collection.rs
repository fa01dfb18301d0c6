//! Whole-collection load/save over a blob store.
//!
//! # Responsibility
//! - Encode/decode a full `Vec<T>` as JSON under one key.
//! - Absorb every persistence failure so callers keep in-memory state.
//!
//! # Invariants
//! - `load` returns an empty collection for absent, unreadable or
//!   undecodable values and never panics.
//! - `save` overwrites the key or leaves it untouched; it never partially
//!   writes a collection.

use super::BlobStore;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Result of a best-effort save, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { bytes: usize },
    Skipped,
}

/// Best-effort persistence of named collections.
#[derive(Debug, Clone)]
pub struct CollectionStore<B: BlobStore> {
    blobs: B,
}

impl<B: BlobStore> CollectionStore<B> {
    pub fn new(blobs: B) -> Self {
        Self { blobs }
    }

    /// Returns the underlying blob store.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Serializes `items` and overwrites `key`.
    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> SaveOutcome {
        let bytes = match serde_json::to_vec(items) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    "event=store_save module=store status=skipped key={key} error_code=encode_failed error={err}"
                );
                return SaveOutcome::Skipped;
            }
        };

        match self.blobs.set(key, &bytes) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok key={key} items={} bytes={}",
                    items.len(),
                    bytes.len()
                );
                SaveOutcome::Written { bytes: bytes.len() }
            }
            Err(err) => {
                warn!(
                    "event=store_save module=store status=skipped key={key} error_code=write_failed error={err}"
                );
                SaveOutcome::Skipped
            }
        }
    }

    /// Reads and decodes `key`, defaulting to an empty collection.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let bytes = match self.blobs.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("event=store_load module=store status=empty key={key}");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=empty key={key} error_code=read_failed error={err}"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(items) => {
                debug!(
                    "event=store_load module=store status=ok key={key} items={}",
                    items.len()
                );
                items
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=empty key={key} error_code=decode_failed error={err}"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectionStore, SaveOutcome};
    use crate::model::coordinate::Coordinate;
    use crate::model::memo::Memo;
    use crate::store::{BlobStore, InMemoryBlobStore};

    #[test]
    fn save_reports_written_bytes() {
        let store = CollectionStore::new(InMemoryBlobStore::new());
        let outcome = store.save("numbers", &[1_u32, 2, 3]);
        assert_eq!(outcome, SaveOutcome::Written { bytes: 7 });
        assert_eq!(store.load::<u32>("numbers"), vec![1, 2, 3]);
    }

    #[test]
    fn load_with_wrong_schema_is_empty() {
        let blobs = InMemoryBlobStore::new();
        blobs.set("numbers", br#"[{"id": "x"}]"#).unwrap();
        let store = CollectionStore::new(blobs);
        assert!(store.load::<u32>("numbers").is_empty());
    }

    #[test]
    fn geotagged_memo_at_coordinate_extremes_round_trips() {
        let store = CollectionStore::new(InMemoryBlobStore::new());
        let mut pole = Memo::new("pole");
        assert!(pole.stamp_location(Coordinate::new(90.0, -180.0)));
        let mut dateline = Memo::new("dateline");
        assert!(dateline.stamp_location(Coordinate::new(-45.125, 179.9375)));

        let memos = vec![pole, dateline];
        assert!(matches!(
            store.save("savedMemos", &memos),
            SaveOutcome::Written { .. }
        ));
        assert_eq!(store.load::<Memo>("savedMemos"), memos);
    }

    #[test]
    fn non_finite_location_skips_save_and_keeps_previous_blob() {
        let store = CollectionStore::new(InMemoryBlobStore::new());
        let kept = vec![Memo::new("kept")];
        store.save("savedMemos", &kept);

        let mut broken = Memo::new("broken");
        broken.location = Some(Coordinate::new(f64::INFINITY, 0.0));
        assert_eq!(store.save("savedMemos", &[broken]), SaveOutcome::Skipped);
        assert_eq!(store.load::<Memo>("savedMemos"), kept);
    }
}
