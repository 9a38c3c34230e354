//! Implements a SQLite backed transaction store.

use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    store::{
        TransactionStore,
        watch::{SnapshotHub, Subscription},
    },
    transaction::{Transaction, TransactionDraft, map_transaction_row},
    user::UserID,
};

/// Stores transactions in a SQLite database and notifies snapshot
/// subscribers after every successful write.
///
/// The transaction table references the user table, so the database must be
/// initialized with both (see [crate::initialize_db]).
#[derive(Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
    hub: Arc<SnapshotHub>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            hub: SnapshotHub::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    fn notify_subscribers(&self, connection: &Connection) {
        self.hub.broadcast(|owner, date_range| {
            query_transactions(connection, owner, date_range)
        });
    }
}

impl TransactionStore for SqliteTransactionStore {
    fn create(&self, draft: TransactionDraft) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\" (owner_id, amount, kind, category, description, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, owner_id, amount, kind, category, description, date",
            )?
            .query_row(
                (
                    draft.owner_id.as_i64(),
                    draft.amount,
                    draft.kind,
                    &draft.category,
                    &draft.description,
                    draft.date,
                ),
                map_transaction_row,
            )?;

        self.notify_subscribers(&connection);

        Ok(transaction)
    }

    fn update(&self, id: TransactionId, draft: TransactionDraft) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "UPDATE \"transaction\"
             SET amount = ?1, kind = ?2, category = ?3, description = ?4, date = ?5
             WHERE id = ?6 AND owner_id = ?7",
            (
                draft.amount,
                draft.kind,
                &draft.category,
                &draft.description,
                draft.date,
                id,
                draft.owner_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        self.notify_subscribers(&connection);

        get_transaction(&connection, id, draft.owner_id)
    }

    fn delete(&self, id: TransactionId, owner: UserID) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2",
            (id, owner.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        self.notify_subscribers(&connection);

        Ok(())
    }

    fn get(&self, id: TransactionId, owner: UserID) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        get_transaction(&connection, id, owner)
    }

    fn list(
        &self,
        owner: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        query_transactions(&connection, owner, date_range.as_ref())
    }

    fn subscribe(
        &self,
        owner: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<Subscription, Error> {
        let connection = self.lock()?;
        let initial_snapshot = query_transactions(&connection, owner, date_range.as_ref())?;
        drop(connection);

        Ok(self.hub.subscribe(owner, date_range, initial_snapshot))
    }
}

fn get_transaction(
    connection: &Connection,
    id: TransactionId,
    owner: UserID,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, owner_id, amount, kind, category, description, date
             FROM \"transaction\" WHERE id = :id AND owner_id = :owner_id",
        )?
        .query_row(
            &[(":id", &id), (":owner_id", &owner.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Get `owner`'s transactions, newest first.
///
/// Results are sorted by date descending and then by ID so the order stays
/// stable after edits.
fn query_transactions(
    connection: &Connection,
    owner: UserID,
    date_range: Option<&RangeInclusive<Date>>,
) -> Result<Vec<Transaction>, Error> {
    let mut statement = match date_range {
        Some(_) => connection.prepare(
            "SELECT id, owner_id, amount, kind, category, description, date
             FROM \"transaction\"
             WHERE owner_id = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date DESC, id ASC",
        )?,
        None => connection.prepare(
            "SELECT id, owner_id, amount, kind, category, description, date
             FROM \"transaction\"
             WHERE owner_id = ?1
             ORDER BY date DESC, id ASC",
        )?,
    };

    let rows = match date_range {
        Some(range) => statement.query_map(
            (owner.as_i64(), range.start(), range.end()),
            map_transaction_row,
        )?,
        None => statement.query_map((owner.as_i64(),), map_transaction_row)?,
    };

    rows.map(|row| row.map_err(Error::SqlError)).collect()
}
