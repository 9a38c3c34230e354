//! Defines the endpoint for creating a new transaction.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, endpoints,
    store::TransactionStore,
    transaction::core::{TransactionDraft, TransactionKind},
    user::UserID,
};

/// The state needed to create, update, or delete a transaction.
#[derive(Clone)]
pub struct TransactionWriteState {
    /// The store that persists transactions and notifies subscribers.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionWriteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    pub description: String,
    /// Whether the transaction is "income" or "expense".
    pub kind: String,
    /// The key of the transaction's category.
    pub category: String,
}

impl TransactionForm {
    /// Validate the form into a draft owned by `owner`.
    pub(super) fn into_draft(self, owner: UserID) -> Result<TransactionDraft, crate::Error> {
        let kind: TransactionKind = self.kind.parse()?;

        TransactionDraft::new(
            owner,
            self.amount,
            kind,
            &self.category,
            &self.description,
            self.date,
        )
    }
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionWriteState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = match form.into_draft(user_id) {
        Ok(draft) => draft,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = state.transaction_store.create(draft) {
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

    use axum::{Extension, extract::State, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use time::macros::date;

    use crate::{
        store::{TransactionStore, memory::MemoryTransactionStore},
        transaction::core::TransactionKind,
        user::UserID,
    };

    use super::{TransactionForm, TransactionWriteState, create_transaction_endpoint};

    fn form(amount: f64, description: &str, kind: &str, category: &str) -> TransactionForm {
        TransactionForm {
            amount,
            date: date!(2025 - 06 - 15),
            description: description.to_string(),
            kind: kind.to_string(),
            category: category.to_string(),
        }
    }

    fn get_state() -> (TransactionWriteState, Arc<MemoryTransactionStore>) {
        let store = Arc::new(MemoryTransactionStore::new());

        (
            TransactionWriteState {
                transaction_store: store.clone(),
            },
            store,
        )
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, store) = get_state();
        let owner = UserID::new(1);

        let response = create_transaction_endpoint(
            State(state),
            Extension(owner),
            Form(form(12.3, "test transaction", "expense", "food")),
        )
        .await
        .into_response();

        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(location, "/transactions");

        let transactions = store.list(owner, None).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 12.3);
        assert_eq!(transactions[0].kind, TransactionKind::Expense);
        assert_eq!(transactions[0].category, "food");
        assert_eq!(transactions[0].owner_id, owner);
    }

    #[tokio::test]
    async fn rejects_invalid_amount_with_alert() {
        let (state, store) = get_state();
        let owner = UserID::new(1);

        let response = create_transaction_endpoint(
            State(state),
            Extension(owner),
            Form(form(0.0, "test transaction", "expense", "food")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(store.list(owner, None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_kind_with_alert() {
        let (state, store) = get_state();
        let owner = UserID::new(1);

        let response = create_transaction_endpoint(
            State(state),
            Extension(owner),
            Form(form(5.0, "test transaction", "transfer", "food")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(store.list(owner, None).unwrap().is_empty());
    }
}
