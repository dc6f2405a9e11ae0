//! List view-state derived from item store snapshots.
//!
//! # Responsibility
//! - Hold the latest item snapshot rendered by the list screen.
//! - Derive `is_empty` from every applied snapshot.
//! - Tie the store subscription to the consumer's attach/detach lifecycle.
//!
//! # Invariants
//! - Records are never written back to the store from here.
//! - `is_empty` is `false` until the first snapshot arrives, so an unloaded
//!   list is not rendered as an empty one.

use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoResult};
use crate::service::item_store::{ItemSnapshot, ItemStore, ItemSubscription};
use log::debug;

#[derive(Debug, Default)]
pub struct ItemListViewState {
    subscription: Option<ItemSubscription>,
    items: Vec<Item>,
    is_empty: bool,
}

impl ItemListViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `store` and applies its current snapshot.
    ///
    /// Re-attaching replaces the previous subscription.
    pub fn attach<R: ItemRepository>(&mut self, store: &ItemStore<R>) -> RepoResult<()> {
        if let Some(previous) = self.subscription.take() {
            store.unsubscribe(previous.id());
        }
        let subscription = store.get_all()?;
        debug!(
            "event=view_attach module=view_state status=ok subscription_id={}",
            subscription.id()
        );
        self.subscription = Some(subscription);
        self.sync();
        Ok(())
    }

    /// Releases the store subscription. The last snapshot stays readable.
    pub fn detach<R: ItemRepository>(&mut self, store: &ItemStore<R>) -> bool {
        match self.subscription.take() {
            Some(subscription) => {
                debug!(
                    "event=view_detach module=view_state status=ok subscription_id={}",
                    subscription.id()
                );
                store.unsubscribe(subscription.id())
            }
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Applies the newest pending snapshot. Returns `true` when one was applied.
    pub fn sync(&mut self) -> bool {
        let latest = self
            .subscription
            .as_ref()
            .and_then(ItemSubscription::latest);
        match latest {
            Some(snapshot) => {
                self.apply(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Drops the row at `position` from the visible list only.
    ///
    /// The next applied snapshot overrides this local removal.
    pub fn remove_at(&mut self, position: usize) -> Option<Item> {
        if position >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(position);
        self.is_empty = self.items.is_empty();
        Some(removed)
    }

    fn apply(&mut self, snapshot: ItemSnapshot) {
        self.is_empty = snapshot.is_empty();
        self.items = snapshot.into_items();
    }
}
