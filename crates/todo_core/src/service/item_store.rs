//! Observable item store.
//!
//! # Responsibility
//! - Expose create/update/delete/delete-all over an `ItemRepository`.
//! - Push a fresh full snapshot to every live subscriber after each
//!   successful mutation.
//!
//! # Invariants
//! - A new subscription receives the current snapshot immediately.
//! - Snapshots are ordered by the repository's natural order (`id ASC`).
//! - Subscribers whose receiver was dropped are pruned on the next publish.
//! - Failed mutations publish nothing.

use crate::model::item::{Item, ItemDraft, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoResult};
use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Identifier of one store subscription.
pub type SubscriptionId = u64;

/// Full item collection at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSnapshot {
    items: Vec<Item>,
}

impl ItemSnapshot {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

/// Receiving end of a store subscription.
///
/// Dropping it releases the subscription lazily; `ItemStore::unsubscribe`
/// releases it eagerly.
#[derive(Debug)]
pub struct ItemSubscription {
    id: SubscriptionId,
    receiver: Receiver<ItemSnapshot>,
}

impl ItemSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the oldest undelivered snapshot, if any.
    pub fn try_next(&self) -> Option<ItemSnapshot> {
        self.receiver.try_recv().ok()
    }

    /// Drains every undelivered snapshot and returns the newest one.
    pub fn latest(&self) -> Option<ItemSnapshot> {
        self.receiver.try_iter().last()
    }

    /// Iterates undelivered snapshots without blocking.
    pub fn pending(&self) -> impl Iterator<Item = ItemSnapshot> + '_ {
        self.receiver.try_iter()
    }
}

struct Subscriber {
    id: SubscriptionId,
    sender: Sender<ItemSnapshot>,
}

/// Item store with snapshot subscriptions.
///
/// Single-threaded: mutations and snapshot delivery happen on the caller's
/// loop.
pub struct ItemStore<R: ItemRepository> {
    repo: R,
    subscribers: RefCell<Vec<Subscriber>>,
    next_subscription_id: Cell<SubscriptionId>,
}

impl<R: ItemRepository> ItemStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            subscribers: RefCell::new(Vec::new()),
            next_subscription_id: Cell::new(1),
        }
    }

    /// Reads the current snapshot without subscribing.
    pub fn snapshot(&self) -> RepoResult<ItemSnapshot> {
        Ok(ItemSnapshot::new(self.repo.list_items()?))
    }

    /// Observable "all items" stream. Alias of [`ItemStore::subscribe`].
    pub fn get_all(&self) -> RepoResult<ItemSubscription> {
        self.subscribe()
    }

    /// Opens a new subscription primed with the current snapshot.
    ///
    /// Each call returns an independent stream, so a consumer restarts by
    /// subscribing again.
    pub fn subscribe(&self) -> RepoResult<ItemSubscription> {
        let current = self.snapshot()?;
        let (sender, receiver) = channel();
        let id = self.next_subscription_id.get();
        self.next_subscription_id.set(id + 1);

        if sender.send(current).is_ok() {
            self.subscribers.borrow_mut().push(Subscriber { id, sender });
        }

        debug!("event=store_subscribe module=store status=ok subscription_id={id}");
        Ok(ItemSubscription { id, receiver })
    }

    /// Releases a subscription. Returns `false` when it was not active.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        let removed = subscribers.len() != before;
        debug!("event=store_unsubscribe module=store status=ok subscription_id={id} removed={removed}");
        removed
    }

    /// Number of subscriptions still registered.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn get(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.get_item(id)
    }

    /// Persists a new item and notifies subscribers.
    ///
    /// # Errors
    /// - `RepoError::Validation` when title or description is empty.
    pub fn insert(&self, draft: &ItemDraft) -> RepoResult<ItemId> {
        let id = self.repo.create_item(draft).inspect_err(|err| {
            warn!("event=item_insert module=store status=error error={err}");
        })?;
        match draft.id {
            Some(preferred) if preferred != id => info!(
                "event=item_insert module=store status=ok item_id={id} reassigned_from={preferred}"
            ),
            _ => info!("event=item_insert module=store status=ok item_id={id}"),
        }
        self.publish();
        Ok(id)
    }

    /// Replaces every field of an existing item and notifies subscribers.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no item has `item.id`.
    /// - `RepoError::Validation` when title or description is empty.
    pub fn update(&self, item: &Item) -> RepoResult<()> {
        self.repo.update_item(item).inspect_err(|err| {
            warn!(
                "event=item_update module=store status=error item_id={} error={err}",
                item.id
            );
        })?;
        info!("event=item_update module=store status=ok item_id={}", item.id);
        self.publish();
        Ok(())
    }

    /// Removes one item. A missing id is a silent no-op.
    pub fn delete_one(&self, id: ItemId) -> RepoResult<bool> {
        let removed = self.repo.delete_item(id).inspect_err(|err| {
            warn!("event=item_delete module=store status=error item_id={id} error={err}");
        })?;
        info!("event=item_delete module=store status=ok item_id={id} removed={removed}");
        if removed {
            self.publish();
        }
        Ok(removed)
    }

    /// Removes every item and returns how many were removed.
    pub fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all_items().inspect_err(|err| {
            warn!("event=item_delete_all module=store status=error error={err}");
        })?;
        info!("event=item_delete_all module=store status=ok removed={removed}");
        self.publish();
        Ok(removed)
    }

    fn publish(&self) {
        if self.subscribers.borrow().is_empty() {
            return;
        }

        let snapshot = match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("event=store_publish module=store status=error error_code=snapshot_read_failed error={err}");
                return;
            }
        };

        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|subscriber| subscriber.sender.send(snapshot.clone()).is_ok());
        debug!(
            "event=store_publish module=store status=ok item_count={} subscribers={}",
            snapshot.len(),
            subscribers.len()
        );
    }
}
