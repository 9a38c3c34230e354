//! Implements a struct that holds the state of the server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::DEFAULT_COOKIE_DURATION,
    db::initialize,
    pagination::PaginationConfig,
    store::{SqliteTransactionStore, TransactionStore},
    suggestion::{CategorySuggester, KeywordSuggester},
};

/// The state of the server.
///
/// The transaction store and the category suggester are constructed once
/// here and passed into the handlers that need them, so tests can substitute
/// fakes.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The database connection, shared with the transaction store.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store that persists transactions and notifies snapshot subscribers.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// The suggester that maps transaction descriptions to category labels.
    pub suggester: Arc<dyn CategorySuggester>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let transaction_store = Arc::new(SqliteTransactionStore::new(connection.clone()));

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            db_connection: connection,
            transaction_store,
            suggester: Arc::new(KeywordSuggester::new()),
        })
    }

    /// Replace the category suggester, e.g. with a fake for tests.
    pub fn with_suggester(mut self, suggester: Arc<dyn CategorySuggester>) -> Self {
        self.suggester = suggester;
        self
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
