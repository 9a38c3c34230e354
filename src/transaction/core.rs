//! Defines the core transaction data model and its database schema.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, database_id::TransactionId, user::UserID};

/// The minimum number of characters a transaction description must have.
pub const MIN_DESCRIPTION_LENGTH: usize = 2;

/// Whether a transaction represents money earned or money spent.
///
/// Transaction amounts are always positive magnitudes; the direction of the
/// money flow is carried solely by this kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money flowing in, e.g. a salary payment.
    Income,
    /// Money flowing out, e.g. a grocery shop.
    Expense,
}

impl TransactionKind {
    /// The kind as the lowercase string stored in the database and used in
    /// forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::InvalidKind(other.to_string())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(InvalidKindColumn(format!("{error}")))))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct InvalidKindColumn(String);

/// An income or expense recorded by a user.
///
/// A transaction belongs to exactly one owner and is only ever created,
/// edited, or deleted by explicit user action. Derived views never mutate
/// transactions.
///
/// To create a new transaction, validate the input with
/// [TransactionDraft::new] and pass the draft to a transaction store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, stable across edits.
    pub id: TransactionId,
    /// The ID of the user the transaction belongs to.
    pub owner_id: UserID,
    /// The amount of money earned or spent, always a positive magnitude.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The key of the transaction's category in the catalog.
    ///
    /// May reference a key that is no longer in the catalog; display code
    /// falls back to rendering the raw key.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The date when the transaction happened, as a civil date in the
    /// application's local timezone.
    pub date: Date,
}

/// A validated transaction waiting to be written to a store.
///
/// Constructing a draft is the only place transaction input is validated;
/// once a [Transaction] exists its fields are assumed well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// The ID of the user the transaction will belong to.
    pub owner_id: UserID,
    /// The positive amount of money earned or spent.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The key of the transaction's category.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The date when the transaction happened.
    pub date: Date,
}

impl TransactionDraft {
    /// Validate transaction input and create a draft.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `amount` is zero, negative, or not finite,
    /// - [Error::DescriptionTooShort] if `description` has fewer than two characters,
    /// - or [Error::MissingCategory] if `category` is empty.
    pub fn new(
        owner_id: UserID,
        amount: f64,
        kind: TransactionKind,
        category: &str,
        description: &str,
        date: Date,
    ) -> Result<Self, Error> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(Error::NonPositiveAmount(amount));
        }

        let description = description.trim();
        if description.graphemes(true).count() < MIN_DESCRIPTION_LENGTH {
            return Err(Error::DescriptionTooShort);
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(Error::MissingCategory);
        }

        Ok(Self {
            owner_id,
            amount,
            kind,
            category: category.to_string(),
            description: description.to_string(),
            date,
        })
    }
}

/// Create the transaction table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER NOT NULL REFERENCES user(id),
                amount REAL NOT NULL CHECK (amount > 0),
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
///
/// The row must contain the columns id, owner_id, amount, kind, category,
/// description, and date, in that order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        owner_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        kind: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
    })
}


#[cfg(test)]
mod transaction_draft_tests {
    use time::macros::date;

    use crate::{Error, user::UserID};

    use super::{TransactionDraft, TransactionKind};

    fn draft(amount: f64, description: &str, category: &str) -> Result<TransactionDraft, Error> {
        TransactionDraft::new(
            UserID::new(1),
            amount,
            TransactionKind::Expense,
            category,
            description,
            date!(2025 - 06 - 15),
        )
    }

    #[test]
    fn accepts_well_formed_input() {
        let result = draft(12.50, "Coffee", "food");

        assert!(result.is_ok());
    }

    #[test]
    fn rejects_zero_amount() {
        assert_eq!(draft(0.0, "Coffee", "food"), Err(Error::NonPositiveAmount(0.0)));
    }

    #[test]
    fn rejects_negative_amount() {
        assert_eq!(
            draft(-5.0, "Coffee", "food"),
            Err(Error::NonPositiveAmount(-5.0))
        );
    }

    #[test]
    fn rejects_non_finite_amount() {
        assert!(matches!(
            draft(f64::NAN, "Coffee", "food"),
            Err(Error::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn rejects_short_description() {
        assert_eq!(draft(12.50, "a", "food"), Err(Error::DescriptionTooShort));
    }

    #[test]
    fn rejects_whitespace_only_description() {
        assert_eq!(draft(12.50, "  a  ", "food"), Err(Error::DescriptionTooShort));
    }

    #[test]
    fn counts_description_length_in_graphemes() {
        // A single family emoji is many bytes but only one grapheme cluster.
        assert_eq!(
            draft(12.50, "👨‍👩‍👧‍👦", "food"),
            Err(Error::DescriptionTooShort)
        );
    }

    #[test]
    fn rejects_empty_category() {
        assert_eq!(draft(12.50, "Coffee", "  "), Err(Error::MissingCategory));
    }

    #[test]
    fn keeps_unrecognized_category_keys() {
        let result = draft(12.50, "Mystery box", "crypto_misc").unwrap();

        assert_eq!(result.category, "crypto_misc");
    }
}
