//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    database_id::TransactionId, transaction::create_endpoint::TransactionWriteState, user::UserID,
};

/// A route handler for deleting a transaction.
///
/// On success the response body is empty so htmx removes the table row it
/// targeted. The status code has to be 200 OK or HTMX will not delete the
/// table row.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionWriteState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.transaction_store.delete(transaction_id, user_id) {
        Ok(()) => Html("").into_response(),
        Err(error) => error.into_alert_response(),
    }
}
