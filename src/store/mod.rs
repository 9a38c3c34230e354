//! Transaction persistence and live snapshot subscriptions.
//!
//! [TransactionStore] is the contract the rest of the application depends
//! on: owner-scoped reads, explicit writes, and snapshot subscriptions that
//! re-deliver the full matching list after every change. The store is
//! constructed once at process start and passed in explicitly wherever it is
//! needed, so tests can substitute an in-memory implementation.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionDraft},
    user::UserID,
};

mod sqlite;
mod watch;

#[cfg(test)]
pub(crate) mod memory;

pub use sqlite::SqliteTransactionStore;
pub use watch::{SnapshotHub, Subscription};

/// Handles the creation, retrieval, and live observation of transactions.
///
/// Reads are always scoped to an owner: a query can only ever return
/// transactions whose owner matches the requesting user. Writes are
/// fire-and-forget from the consumer's perspective; failures surface to the
/// user as a notification and are not retried automatically.
pub trait TransactionStore: Send + Sync {
    /// Create a new transaction from a validated draft.
    fn create(&self, draft: TransactionDraft) -> Result<Transaction, Error>;

    /// Replace the fields of the transaction with `id` with those of `draft`.
    ///
    /// The transaction must belong to the draft's owner.
    ///
    /// # Errors
    ///
    /// Returns [Error::UpdateMissingTransaction] if no transaction with `id`
    /// belongs to the draft's owner.
    fn update(&self, id: TransactionId, draft: TransactionDraft) -> Result<Transaction, Error>;

    /// Delete the transaction with `id` belonging to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [Error::DeleteMissingTransaction] if no transaction with `id`
    /// belongs to `owner`.
    fn delete(&self, id: TransactionId, owner: UserID) -> Result<(), Error>;

    /// Retrieve the transaction with `id` belonging to `owner`.
    fn get(&self, id: TransactionId, owner: UserID) -> Result<Transaction, Error>;

    /// Retrieve the transactions belonging to `owner`, newest first.
    ///
    /// When `date_range` is given, only transactions dated within it
    /// (inclusive on both bounds) are returned. Results are ordered by date
    /// descending, then by ID ascending so the order is stable across edits.
    fn list(
        &self,
        owner: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<Vec<Transaction>, Error>;

    /// Open a live snapshot subscription for `owner`.
    ///
    /// The subscription starts with the current matching list and receives
    /// the full, fresh list (same scope and ordering as [TransactionStore::list])
    /// after every subsequent write to the store. Each delivery replaces the
    /// previous snapshot; there is no incremental merge. Dropping the
    /// subscription deregisters it, after which no further snapshots are
    /// delivered.
    fn subscribe(
        &self,
        owner: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<Subscription, Error>;
}
