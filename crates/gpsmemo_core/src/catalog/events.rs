//! Change notifications for catalog observers.

use crate::model::category::{Category, CategoryId};
use crate::model::coordinate::Coordinate;
use crate::model::memo::Memo;
use log::debug;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

/// Pending events a subscriber may hold before newer ones are dropped.
pub const CHANGE_BUFFER: usize = 64;

/// Observable state change emitted after a catalog mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogChange {
    MemosChanged,
    CategoriesChanged,
    SelectionChanged(Option<CategoryId>),
    LocationChanged(Coordinate),
    AddressChanged(String),
}

/// Owned copy of everything a presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub memos: Vec<Memo>,
    pub categories: Vec<Category>,
    pub selected_category_id: Option<CategoryId>,
    pub current_location: Option<Coordinate>,
    pub current_address: Option<String>,
}

/// Fan-out of change events to subscribers.
///
/// Each subscriber gets a bounded queue of `CHANGE_BUFFER` events. A full
/// queue drops the new event for that subscriber only; a dropped receiver
/// is pruned.
#[derive(Debug, Default)]
pub(crate) struct ChangeFeed {
    subscribers: Vec<SyncSender<CatalogChange>>,
}

impl ChangeFeed {
    pub(crate) fn subscribe(&mut self) -> Receiver<CatalogChange> {
        let (tx, rx) = sync_channel(CHANGE_BUFFER);
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn publish(&mut self, change: CatalogChange) {
        self.subscribers
            .retain(|subscriber| match subscriber.try_send(change.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    debug!("event=change_publish module=catalog status=dropped reason=buffer_full");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogChange, ChangeFeed, CHANGE_BUFFER};

    #[test]
    fn publish_prunes_dropped_subscribers() {
        let mut feed = ChangeFeed::default();
        let kept = feed.subscribe();
        let dropped = feed.subscribe();
        drop(dropped);

        feed.publish(CatalogChange::MemosChanged);
        assert_eq!(feed.subscribers.len(), 1);
        assert_eq!(kept.try_recv().unwrap(), CatalogChange::MemosChanged);
    }

    #[test]
    fn idle_subscriber_queue_stays_bounded() {
        let mut feed = ChangeFeed::default();
        let idle = feed.subscribe();

        for _ in 0..CHANGE_BUFFER + 10 {
            feed.publish(CatalogChange::MemosChanged);
        }
        feed.publish(CatalogChange::CategoriesChanged);

        assert_eq!(feed.subscribers.len(), 1);
        let queued = idle.try_iter().collect::<Vec<_>>();
        assert_eq!(queued.len(), CHANGE_BUFFER);
        assert!(queued.iter().all(|change| *change == CatalogChange::MemosChanged));

        feed.publish(CatalogChange::CategoriesChanged);
        assert_eq!(idle.try_recv().unwrap(), CatalogChange::CategoriesChanged);
    }
}
