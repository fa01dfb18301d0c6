//! `NoteCatalog`: single-writer owner of memos, categories and location
//! state.

use super::events::{CatalogChange, CatalogSnapshot, ChangeFeed};
use super::order::move_in_view;
use super::{CatalogError, CatalogResult, CategoryDeletion, UpsertOutcome};
use crate::location::{
    location_channel, GeocodeReply, LocationCapability, LocationEvent, LocationSink,
};
use crate::model::category::{Category, CategoryId};
use crate::model::coordinate::Coordinate;
use crate::model::memo::{Memo, MemoId};
use crate::store::{BlobStore, CollectionStore, SaveOutcome, StoreKeys};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

/// Authoritative in-memory catalog backed by a blob store.
///
/// All mutations take `&mut self`; the location subsystem reaches the
/// catalog only through its event channel, drained by
/// [`NoteCatalog::pump_location_events`].
pub struct NoteCatalog<B: BlobStore> {
    store: CollectionStore<B>,
    keys: StoreKeys,
    memos: Vec<Memo>,
    categories: Vec<Category>,
    selected_category_id: Option<CategoryId>,
    current_location: Option<Coordinate>,
    current_address: Option<String>,
    location: Option<Box<dyn LocationCapability>>,
    location_sink: LocationSink,
    location_events: Receiver<LocationEvent>,
    changes: ChangeFeed,
}

impl<B: BlobStore> NoteCatalog<B> {
    /// Loads both collections from `blobs` under the default keys.
    pub fn open(blobs: B) -> Self {
        Self::with_keys(blobs, StoreKeys::default())
    }

    /// Loads both collections from `blobs` under custom keys.
    ///
    /// Missing or undecodable data yields empty collections.
    pub fn with_keys(blobs: B, keys: StoreKeys) -> Self {
        let store = CollectionStore::new(blobs);
        let memos: Vec<Memo> = store.load(&keys.memos);
        let categories: Vec<Category> = store.load(&keys.categories);
        let (location_sink, location_events) = location_channel();

        info!(
            "event=catalog_open module=catalog status=ok memos={} categories={}",
            memos.len(),
            categories.len()
        );

        Self {
            store,
            keys,
            memos,
            categories,
            selected_category_id: None,
            current_location: None,
            current_address: None,
            location: None,
            location_sink,
            location_events,
            changes: ChangeFeed::default(),
        }
    }

    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category_id(&self) -> Option<CategoryId> {
        self.selected_category_id
    }

    pub fn current_location(&self) -> Option<Coordinate> {
        self.current_location
    }

    pub fn current_address(&self) -> Option<&str> {
        self.current_address.as_deref()
    }

    /// Returns the underlying blob store.
    pub fn blobs(&self) -> &B {
        self.store.blobs()
    }

    pub fn memo(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Name of the category `memo` points at, if it still exists.
    pub fn category_name(&self, memo: &Memo) -> Option<&str> {
        memo.category_id
            .and_then(|id| self.category(id))
            .map(|category| category.name.as_str())
    }

    /// Stamps the current location onto a memo that has none yet.
    ///
    /// Returns `true` when the memo was stamped.
    pub fn prepare_memo(&self, memo: &mut Memo) -> bool {
        match self.current_location {
            Some(coordinate) => memo.stamp_location(coordinate),
            None => false,
        }
    }

    /// Inserts or replaces a memo by id, then persists memos.
    ///
    /// Blank text is rejected without mutation or persistence.
    pub fn upsert_memo(&mut self, memo: Memo) -> UpsertOutcome {
        if memo.is_blank() {
            debug!(
                "event=memo_upsert module=catalog status=skipped reason=blank_text memo_id={}",
                memo.id
            );
            return UpsertOutcome::SkippedEmpty;
        }

        let memo_id = memo.id;
        let outcome = match self.memos.iter().position(|m| m.id == memo_id) {
            Some(index) => {
                self.memos[index] = memo;
                UpsertOutcome::Replaced
            }
            None => {
                self.memos.push(memo);
                UpsertOutcome::Inserted
            }
        };

        info!(
            "event=memo_upsert module=catalog status=ok outcome={outcome:?} memo_id={memo_id}"
        );
        self.memos_mutated();
        outcome
    }

    /// Removes one memo by id, then persists memos.
    ///
    /// # Errors
    /// - `MemoNotFound` when no memo has `id`; nothing is persisted.
    pub fn delete_memo(&mut self, id: MemoId) -> CatalogResult<Memo> {
        let index = self
            .memos
            .iter()
            .position(|memo| memo.id == id)
            .ok_or(CatalogError::MemoNotFound(id))?;
        let removed = self.memos.remove(index);

        info!("event=memo_delete module=catalog status=ok memo_id={id}");
        self.memos_mutated();
        Ok(removed)
    }

    /// Removes the memos at `offsets` of the visible list.
    ///
    /// Offsets are resolved against the view filtered by the selected
    /// category. Duplicates are ignored; all offsets are validated before
    /// anything is removed. Removed memos are returned in view order.
    pub fn delete_memos_at(&mut self, offsets: &[usize]) -> CatalogResult<Vec<Memo>> {
        let slots = self.visible_slots();
        let unique: BTreeSet<usize> = offsets.iter().copied().collect();
        if let Some(&index) = unique.iter().find(|&&offset| offset >= slots.len()) {
            return Err(CatalogError::IndexOutOfRange {
                index,
                len: slots.len(),
            });
        }
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let mut removed: Vec<Memo> = unique
            .iter()
            .rev()
            .map(|&offset| self.memos.remove(slots[offset]))
            .collect();
        removed.reverse();

        info!(
            "event=memo_delete module=catalog status=ok count={}",
            removed.len()
        );
        self.memos_mutated();
        Ok(removed)
    }

    /// Moves one memo of the visible list from `from` to final index `to`.
    ///
    /// With a category selected, indices address the filtered list and the
    /// result is written back into the full sequence: memos outside the
    /// filter keep their positions.
    pub fn reorder_memos(&mut self, from: usize, to: usize) -> CatalogResult<()> {
        let slots = self.visible_slots();
        for index in [from, to] {
            if index >= slots.len() {
                return Err(CatalogError::IndexOutOfRange {
                    index,
                    len: slots.len(),
                });
            }
        }

        move_in_view(&mut self.memos, &slots, from, to);
        info!(
            "event=memo_reorder module=catalog status=ok from={from} to={to} filtered={}",
            self.selected_category_id.is_some()
        );
        self.memos_mutated();
        Ok(())
    }

    /// Inserts or replaces a category by id, then persists categories.
    pub fn upsert_category(&mut self, category: Category) -> UpsertOutcome {
        let category_id = category.id;
        let outcome = match self.categories.iter().position(|c| c.id == category_id) {
            Some(index) => {
                self.categories[index] = category;
                UpsertOutcome::Replaced
            }
            None => {
                self.categories.push(category);
                UpsertOutcome::Inserted
            }
        };

        info!(
            "event=category_upsert module=catalog status=ok outcome={outcome:?} category_id={category_id}"
        );
        self.categories_mutated();
        outcome
    }

    /// Removes a category and clears every memo reference to it.
    ///
    /// Persists categories, then memos. A selection filter pointing at the
    /// deleted category is reset.
    pub fn delete_category(&mut self, id: CategoryId) -> CategoryDeletion {
        let category = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .map(|index| self.categories.remove(index));

        let mut cleared_memos = 0;
        for memo in self.memos.iter_mut().filter(|m| m.category_id == Some(id)) {
            memo.category_id = None;
            cleared_memos += 1;
        }

        info!(
            "event=category_delete module=catalog status=ok category_id={id} found={} cleared_memos={cleared_memos}",
            category.is_some()
        );
        self.categories_mutated();
        self.memos_mutated();

        if self.selected_category_id == Some(id) {
            self.select_category(None);
        }

        CategoryDeletion {
            category,
            cleared_memos,
        }
    }

    /// Deletes the categories at `offsets` of the category list.
    ///
    /// All offsets are validated before anything is removed.
    pub fn delete_categories_at(
        &mut self,
        offsets: &[usize],
    ) -> CatalogResult<Vec<CategoryDeletion>> {
        let unique: BTreeSet<usize> = offsets.iter().copied().collect();
        let len = self.categories.len();
        if let Some(&index) = unique.iter().find(|&&offset| offset >= len) {
            return Err(CatalogError::IndexOutOfRange { index, len });
        }

        let ids: Vec<CategoryId> = unique
            .iter()
            .map(|&offset| self.categories[offset].id)
            .collect();
        Ok(ids.into_iter().map(|id| self.delete_category(id)).collect())
    }

    /// Sets the list filter. `None` shows every memo.
    pub fn select_category(&mut self, category_id: Option<CategoryId>) {
        if self.selected_category_id == category_id {
            return;
        }
        self.selected_category_id = category_id;
        debug!(
            "event=category_select module=catalog status=ok filtered={}",
            category_id.is_some()
        );
        self.changes
            .publish(CatalogChange::SelectionChanged(category_id));
    }

    /// Memos whose category equals `category_id`, or all memos for `None`.
    pub fn filtered_memos(&self, category_id: Option<CategoryId>) -> Vec<&Memo> {
        self.memos
            .iter()
            .filter(|memo| category_id.is_none() || memo.category_id == category_id)
            .collect()
    }

    /// Memos filtered by the current selection.
    pub fn visible_memos(&self) -> Vec<&Memo> {
        self.filtered_memos(self.selected_category_id)
    }

    /// Handle for posting location events from any thread.
    pub fn location_sink(&self) -> LocationSink {
        self.location_sink.clone()
    }

    /// Requests permission and starts position updates.
    ///
    /// Returns `false` when location is unavailable; the catalog keeps
    /// working without coordinates.
    pub fn attach_location(&mut self, capability: Box<dyn LocationCapability>) -> bool {
        if let Err(err) = capability.request_permission() {
            warn!(
                "event=location_attach module=catalog status=degraded error_code=permission error={err}"
            );
            return false;
        }
        if let Err(err) = capability.start_updates(self.location_sink.clone()) {
            warn!(
                "event=location_attach module=catalog status=degraded error_code=start_updates error={err}"
            );
            return false;
        }

        info!("event=location_attach module=catalog status=ok");
        self.location = Some(capability);
        true
    }

    /// Records a new device position and fires a reverse-geocode lookup.
    ///
    /// Non-finite or out-of-range coordinates are dropped.
    pub fn ingest_location_update(&mut self, coordinate: Coordinate) {
        if !coordinate.is_valid() {
            warn!("event=location_update module=catalog status=dropped reason=invalid_coordinate");
            return;
        }

        self.current_location = Some(coordinate);
        self.changes
            .publish(CatalogChange::LocationChanged(coordinate));

        match self.location.as_ref() {
            Some(capability) => capability.reverse_geocode(
                coordinate,
                GeocodeReply::new(coordinate, self.location_sink.clone()),
            ),
            None => debug!("event=geocode module=catalog status=skipped reason=no_capability"),
        }
    }

    /// Applies every pending location event on the calling thread.
    ///
    /// Returns the number of events processed.
    pub fn pump_location_events(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.location_events.try_recv() {
            processed += 1;
            match event {
                LocationEvent::Position(coordinate) => self.ingest_location_update(coordinate),
                LocationEvent::Address {
                    coordinate,
                    result: Ok(address),
                } => self.apply_address(coordinate, address),
                LocationEvent::Address {
                    result: Err(err), ..
                } => {
                    warn!("event=geocode module=catalog status=error error={err}");
                }
                LocationEvent::Failed(err) => {
                    warn!("event=location_update module=catalog status=error error={err}");
                }
            }
        }
        processed
    }

    /// Owned copy of the observable state.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            memos: self.memos.clone(),
            categories: self.categories.clone(),
            selected_category_id: self.selected_category_id,
            current_location: self.current_location,
            current_address: self.current_address.clone(),
        }
    }

    /// Subscribes to change events emitted after each mutation.
    ///
    /// The receiver buffers at most `CHANGE_BUFFER` unread events; later
    /// events are dropped for this subscriber until it drains the queue.
    pub fn subscribe(&mut self) -> Receiver<CatalogChange> {
        self.changes.subscribe()
    }

    fn apply_address(&mut self, coordinate: Coordinate, address: String) {
        if self.current_location != Some(coordinate) {
            debug!("event=geocode module=catalog status=dropped reason=stale");
            return;
        }
        self.current_address = Some(address.clone());
        self.changes.publish(CatalogChange::AddressChanged(address));
    }

    fn visible_slots(&self) -> Vec<usize> {
        let filter = self.selected_category_id;
        self.memos
            .iter()
            .enumerate()
            .filter(|(_, memo)| filter.is_none() || memo.category_id == filter)
            .map(|(index, _)| index)
            .collect()
    }

    fn memos_mutated(&mut self) {
        if let SaveOutcome::Skipped = self.store.save(&self.keys.memos, &self.memos) {
            warn!("event=memo_persist module=catalog status=skipped");
        }
        self.changes.publish(CatalogChange::MemosChanged);
    }

    fn categories_mutated(&mut self) {
        if let SaveOutcome::Skipped = self.store.save(&self.keys.categories, &self.categories) {
            warn!("event=category_persist module=catalog status=skipped");
        }
        self.changes.publish(CatalogChange::CategoriesChanged);
    }
}
