//! The snapshot hub: fan-out of full transaction snapshots to subscribers.
//!
//! A store owns one [SnapshotHub]. View code registers a scope (owner plus
//! optional date range) and gets back a [Subscription]; after every
//! successful write the store asks the hub to re-query each registered scope
//! and push the fresh snapshot into the subscription's channel. Dropping a
//! subscription deregisters it, so a torn-down view receives nothing.

use std::{
    ops::RangeInclusive,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use time::Date;
use tokio::sync::watch;

use crate::{Error, transaction::Transaction, user::UserID};

struct Watcher {
    id: u64,
    owner: UserID,
    date_range: Option<RangeInclusive<Date>>,
    sender: watch::Sender<Vec<Transaction>>,
}

/// The registry of live snapshot subscriptions for one store.
pub struct SnapshotHub {
    watchers: Mutex<Vec<Watcher>>,
    next_id: AtomicU64,
}

impl SnapshotHub {
    /// Create an empty hub.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            watchers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        })
    }

    /// Register a subscription for `owner` seeded with `initial_snapshot`.
    ///
    /// # Panics
    ///
    /// Panics if the watcher lock was poisoned by a panicking thread.
    pub fn subscribe(
        self: &Arc<Self>,
        owner: UserID,
        date_range: Option<RangeInclusive<Date>>,
        initial_snapshot: Vec<Transaction>,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = watch::channel(initial_snapshot);

        self.watchers.lock().unwrap().push(Watcher {
            id,
            owner,
            date_range,
            sender,
        });

        Subscription {
            id,
            hub: Arc::clone(self),
            receiver,
        }
    }

    /// Push a fresh snapshot to every registered subscription.
    ///
    /// `fetch` is called once per subscription with its scope and should
    /// return the full matching transaction list. If `fetch` fails for a
    /// subscription the error is logged and that subscription keeps its
    /// last-known snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the watcher lock was poisoned by a panicking thread.
    pub fn broadcast<F>(&self, mut fetch: F)
    where
        F: FnMut(UserID, Option<&RangeInclusive<Date>>) -> Result<Vec<Transaction>, Error>,
    {
        let mut watchers = self.watchers.lock().unwrap();

        watchers.retain(|watcher| !watcher.sender.is_closed());

        for watcher in watchers.iter() {
            match fetch(watcher.owner, watcher.date_range.as_ref()) {
                Ok(snapshot) => {
                    // Send only fails when the receiver is gone, in which
                    // case the watcher is removed on the next broadcast.
                    let _ = watcher.sender.send(snapshot);
                }
                Err(error) => {
                    tracing::error!(
                        "could not refresh snapshot for subscription {}: {error}",
                        watcher.id
                    );
                }
            }
        }
    }

    /// The number of registered subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.watchers.lock().unwrap().len()
    }

    fn deregister(&self, id: u64) {
        self.watchers
            .lock()
            .unwrap()
            .retain(|watcher| watcher.id != id);
    }
}

/// A live view of one owner's transactions.
///
/// Holds the most recently delivered snapshot. Dropping the subscription
/// (or calling [Subscription::unsubscribe]) deregisters it from the hub and
/// stops all further deliveries.
pub struct Subscription {
    id: u64,
    hub: Arc<SnapshotHub>,
    receiver: watch::Receiver<Vec<Transaction>>,
}

impl Subscription {
    /// The most recently delivered snapshot.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.receiver.borrow().clone()
    }

    /// Wait until a snapshot newer than the last seen one is delivered.
    ///
    /// Returns `false` if the store side of the channel has gone away, after
    /// which no further snapshots will arrive.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Tear the subscription down.
    ///
    /// Equivalent to dropping it; spelled out so view teardown can release
    /// the subscription explicitly.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.deregister(self.id);
    }
}
