/// A database row ID.
pub type DatabaseId = i64;
/// The database ID for a transaction.
pub type TransactionId = DatabaseId;
