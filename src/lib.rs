//! Centsible is a web app for tracking personal income and expenses.
//!
//! Users record transactions against a fixed category catalog, review
//! summaries on a dashboard, and browse monthly reports with category
//! breakdowns. All derived views (totals, monthly series, category totals,
//! table projections) are computed by the pure functions in [aggregation].
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

pub mod aggregation;
mod alert;
mod app_state;
mod auth;
pub mod catalog;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod report;
mod routing;
pub mod store;
pub mod suggestion;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use auth::{PasswordHash, ValidatedPassword};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
pub use user::{Email, User, UserID};

use crate::{
    alert::Alert,
    internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email/password combination that does not match a
    /// registered user.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar :(")]
    CookieMissing,

    /// The auth token could not be serialized or parsed.
    ///
    /// Callers should pass in the original error as a string.
    #[error("could not read auth token: {0}")]
    TokenError(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A string that is not a valid email address was used to register or
    /// log in.
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    /// The email used for registration already belongs to a user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A transaction description shorter than two characters was used to
    /// create or edit a transaction.
    #[error("the description must be at least 2 characters long")]
    DescriptionTooShort,

    /// A zero, negative, or non-finite amount was used to create or edit a
    /// transaction. Amounts are positive magnitudes; direction is carried by
    /// the transaction kind.
    #[error("{0} is not a valid amount, amounts must be positive")]
    NonPositiveAmount(f64),

    /// An empty category key was used to create or edit a transaction.
    #[error("a category must be selected")]
    MissingCategory,

    /// A string other than "income" or "expense" was used as a transaction
    /// kind.
    #[error("{0} is not a valid transaction kind")]
    InvalidKind(String),

    /// A description shorter than three characters was sent to the category
    /// suggester.
    #[error("the description is too short for a suggestion")]
    SuggestionTooShort,

    /// The category suggester failed to produce a suggestion.
    ///
    /// The error string should only be logged on the server; the category
    /// field is left for the user to fill in manually.
    #[error("category suggestion failed: {0}")]
    SuggestionFailed(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => render_internal_server_error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            ),
            Error::DatabaseLockError => render_internal_server_error(
                "Sorry, something went wrong.",
                "Try again later or check the server logs",
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs",
                )
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::DescriptionTooShort => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid description",
                    "The description must be at least 2 characters long.",
                )
                .into_html(),
            )
                .into_response(),
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid amount",
                    &format!("{amount} is not a valid amount. Amounts must be greater than zero."),
                )
                .into_html(),
            )
                .into_response(),
            Error::MissingCategory => (
                StatusCode::BAD_REQUEST,
                Alert::error("Missing category", "Select a category for the transaction.")
                    .into_html(),
            )
                .into_response(),
            Error::InvalidKind(kind) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid transaction type",
                    &format!("\"{kind}\" is not a valid transaction type."),
                )
                .into_html(),
            )
                .into_response(),
            Error::SuggestionTooShort => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Description too short",
                    "Enter at least 3 characters to get a category suggestion.",
                )
                .into_html(),
            )
                .into_response(),
            Error::SuggestionFailed(error) => {
                tracing::error!("category suggestion failed: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::error(
                        "Suggestion failed",
                        "Could not suggest a category. Please pick one manually.",
                    )
                    .into_html(),
                )
                    .into_response()
            }
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                )
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                )
                .into_html(),
            )
                .into_response(),
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Email already registered",
                    "A user with this email address already exists. Try logging in instead.",
                )
                .into_html(),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    )
                    .into_html(),
                )
                    .into_response()
            }
        }
    }
}
