//! Defines the endpoint for updating an existing transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    database_id::TransactionId,
    endpoints,
    transaction::create_endpoint::{TransactionForm, TransactionWriteState},
    user::UserID,
};

/// A route handler for updating a transaction, redirects to the transactions
/// view on success.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionWriteState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = match form.into_draft(user_id) {
        Ok(draft) => draft,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = state.transaction_store.update(transaction_id, draft) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, extract::{Path, State}, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        store::{TransactionStore, memory::MemoryTransactionStore},
        transaction::{
            core::{TransactionDraft, TransactionKind},
            create_endpoint::{TransactionForm, TransactionWriteState},
        },
        user::UserID,
    };

    use super::edit_transaction_endpoint;

    #[tokio::test]
    async fn can_edit_transaction() {
        let store = Arc::new(MemoryTransactionStore::new());
        let owner = UserID::new(1);
        let created = store
            .create(
                TransactionDraft::new(
                    owner,
                    10.0,
                    TransactionKind::Expense,
                    "food",
                    "groceries",
                    date!(2025 - 06 - 01),
                )
                .unwrap(),
            )
            .unwrap();
        let state = TransactionWriteState {
            transaction_store: store.clone(),
        };

        let form = TransactionForm {
            amount: 25.0,
            date: date!(2025 - 06 - 02),
            description: "weekly groceries".to_string(),
            kind: "expense".to_string(),
            category: "food".to_string(),
        };
        let response = edit_transaction_endpoint(
            State(state),
            Extension(owner),
            Path(created.id),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let updated = store.get(created.id, owner).unwrap();
        assert_eq!(updated.amount, 25.0);
        assert_eq!(updated.description, "weekly groceries");
    }

    #[tokio::test]
    async fn editing_missing_transaction_returns_not_found_alert() {
        let store = Arc::new(MemoryTransactionStore::new());
        let state = TransactionWriteState {
            transaction_store: store,
        };

        let form = TransactionForm {
            amount: 25.0,
            date: date!(2025 - 06 - 02),
            description: "weekly groceries".to_string(),
            kind: "expense".to_string(),
            category: "food".to_string(),
        };
        let response = edit_transaction_endpoint(
            State(state),
            Extension(UserID::new(1)),
            Path(42),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
