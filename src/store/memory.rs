//! An in-memory transaction store for tests.
//!
//! Implements the same contract as the SQLite store, which lets handler and
//! binder tests substitute a store without touching a database.

use std::{
    ops::RangeInclusive,
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering},
    },
};

use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    store::{
        TransactionStore,
        watch::{SnapshotHub, Subscription},
    },
    transaction::{Transaction, TransactionDraft},
    user::UserID,
};

pub(crate) struct MemoryTransactionStore {
    rows: Mutex<Vec<Transaction>>,
    next_id: AtomicI64,
    hub: Arc<SnapshotHub>,
}

impl MemoryTransactionStore {
    pub(crate) fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            hub: SnapshotHub::new(),
        }
    }

    fn matching(
        rows: &[Transaction],
        owner: UserID,
        date_range: Option<&RangeInclusive<Date>>,
    ) -> Vec<Transaction> {
        let mut matching: Vec<Transaction> = rows
            .iter()
            .filter(|transaction| transaction.owner_id == owner)
            .filter(|transaction| {
                date_range
                    .map(|range| range.contains(&transaction.date))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        // Same ordering contract as the SQLite store: newest first, stable IDs.
        matching.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        matching
    }

    fn notify_subscribers(&self, rows: &[Transaction]) {
        self.hub
            .broadcast(|owner, date_range| Ok(Self::matching(rows, owner, date_range)));
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn create(&self, draft: TransactionDraft) -> Result<Transaction, Error> {
        let mut rows = self.rows.lock().unwrap();

        let transaction = Transaction {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            owner_id: draft.owner_id,
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            description: draft.description,
            date: draft.date,
        };
        rows.push(transaction.clone());

        self.notify_subscribers(&rows);

        Ok(transaction)
    }

    fn update(&self, id: TransactionId, draft: TransactionDraft) -> Result<Transaction, Error> {
        let mut rows = self.rows.lock().unwrap();

        let row = rows
            .iter_mut()
            .find(|transaction| transaction.id == id && transaction.owner_id == draft.owner_id)
            .ok_or(Error::UpdateMissingTransaction)?;

        row.amount = draft.amount;
        row.kind = draft.kind;
        row.category = draft.category;
        row.description = draft.description;
        row.date = draft.date;
        let updated = row.clone();

        self.notify_subscribers(&rows);

        Ok(updated)
    }

    fn delete(&self, id: TransactionId, owner: UserID) -> Result<(), Error> {
        let mut rows = self.rows.lock().unwrap();

        let before = rows.len();
        rows.retain(|transaction| !(transaction.id == id && transaction.owner_id == owner));
        if rows.len() == before {
            return Err(Error::DeleteMissingTransaction);
        }

        self.notify_subscribers(&rows);

        Ok(())
    }

    fn get(&self, id: TransactionId, owner: UserID) -> Result<Transaction, Error> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|transaction| transaction.id == id && transaction.owner_id == owner)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn list(
        &self,
        owner: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<Vec<Transaction>, Error> {
        let rows = self.rows.lock().unwrap();

        Ok(Self::matching(&rows, owner, date_range.as_ref()))
    }

    fn subscribe(
        &self,
        owner: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<Subscription, Error> {
        let rows = self.rows.lock().unwrap();
        let initial_snapshot = Self::matching(&rows, owner, date_range.as_ref());
        drop(rows);

        Ok(self.hub.subscribe(owner, date_range, initial_snapshot))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        store::TransactionStore,
        transaction::{TransactionDraft, TransactionKind},
        user::UserID,
    };

    use super::MemoryTransactionStore;

    // The view model contract end to end, against the substituted store:
    // subscribe, observe writes as full snapshots, tear down, observe nothing.
    #[tokio::test]
    async fn behaves_like_the_sqlite_store_for_subscribers() {
        let store = MemoryTransactionStore::new();
        let owner = UserID::new(1);
        let mut subscription = store.subscribe(owner, None).unwrap();

        let draft = TransactionDraft::new(
            owner,
            9.99,
            TransactionKind::Expense,
            "entertainment",
            "cinema",
            date!(2025 - 03 - 08),
        )
        .unwrap();
        let created = store.create(draft).unwrap();

        assert!(subscription.changed().await);
        assert_eq!(subscription.snapshot(), vec![created.clone()]);

        subscription.unsubscribe();
        store.delete(created.id, owner).unwrap();
        assert!(store.list(owner, None).unwrap().is_empty());
    }
}
