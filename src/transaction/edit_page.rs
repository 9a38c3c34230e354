//! Defines the page for editing an existing transaction.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, link, loading_spinner},
    navigation::NavBar,
    store::TransactionStore,
    transaction::form::{TransactionFormDefaults, transaction_form_fields},
    user::UserID,
};

/// The state needed to display the edit transaction page.
#[derive(Clone)]
pub struct EditTransactionPageState {
    /// The store that holds the transaction being edited.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Display the page for editing the transaction with `transaction_id`.
///
/// # Errors
///
/// Returns a 404 page if the transaction does not exist or belongs to
/// another user.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = state.transaction_store.get(transaction_id, user_id)?;

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        kind: transaction.kind,
        amount: Some(transaction.amount),
        date: transaction.date,
        description: Some(&transaction.description),
        category: Some(&transaction.category),
    });
    let update_endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id);

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md"
            {
                h1 class="text-xl font-bold mb-4" { "Edit Transaction" }

                form
                    hx-put=(update_endpoint)
                    hx-indicator="#indicator"
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    (form_fields)

                    button
                        type="submit" id="submit-button" tabindex="0"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        span class="inline htmx-indicator" id="indicator"
                        {
                            (loading_spinner())
                        }
                        "Save Changes"
                    }
                }

                p class="mt-4"
                {
                    (link(endpoints::TRANSACTIONS_VIEW, "Back to transactions"))
                }
            }
        }
    );

    Ok(base("Edit Transaction", &[], &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Extension,
        extract::{Path, State},
    };
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        store::{TransactionStore, memory::MemoryTransactionStore},
        transaction::core::{TransactionDraft, TransactionKind},
        user::UserID,
    };

    use super::{EditTransactionPageState, get_edit_transaction_page};

    #[tokio::test]
    async fn page_prefills_existing_values() {
        let store = Arc::new(MemoryTransactionStore::new());
        let owner = UserID::new(1);
        let created = store
            .create(
                TransactionDraft::new(
                    owner,
                    42.5,
                    TransactionKind::Expense,
                    "transport",
                    "bus fare",
                    date!(2025 - 05 - 20),
                )
                .unwrap(),
            )
            .unwrap();
        let state = EditTransactionPageState {
            transaction_store: store,
        };

        let response = get_edit_transaction_page(State(state), Extension(owner), Path(created.id))
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_document(&String::from_utf8_lossy(&body));

        let description_selector = Selector::parse("input[name=description]").unwrap();
        let description = html
            .select(&description_selector)
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(description, Some("bus fare"));

        let selected_selector = Selector::parse("option[selected]").unwrap();
        let selected = html
            .select(&selected_selector)
            .next()
            .and_then(|option| option.value().attr("value"));
        assert_eq!(selected, Some("transport"));
    }

    #[tokio::test]
    async fn another_users_transaction_is_not_found() {
        let store = Arc::new(MemoryTransactionStore::new());
        let owner = UserID::new(1);
        let created = store
            .create(
                TransactionDraft::new(
                    owner,
                    42.5,
                    TransactionKind::Expense,
                    "transport",
                    "bus fare",
                    date!(2025 - 05 - 20),
                )
                .unwrap(),
            )
            .unwrap();
        let state = EditTransactionPageState {
            transaction_store: store,
        };

        let result =
            get_edit_transaction_page(State(state), Extension(UserID::new(2)), Path(created.id))
                .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
