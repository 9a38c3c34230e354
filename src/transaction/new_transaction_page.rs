//! Defines the page for creating a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        core::TransactionKind,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

/// The state needed to display the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the page for creating a new transaction.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        kind: TransactionKind::Expense,
        amount: None,
        date: today,
        description: None,
        category: None,
    });

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md"
            {
                h1 class="text-xl font-bold mb-4" { "New Transaction" }

                form
                    hx-post=(endpoints::TRANSACTIONS_API)
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
                        "Add Transaction"
                    }
                }
            }
        }
    );

    Ok(base("New Transaction", &[], &content).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::State, http::Response};
    use scraper::{Html, Selector};

    use super::{NewTransactionPageState, get_new_transaction_page};

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[tokio::test]
    async fn page_renders_transaction_form() {
        let state = NewTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_new_transaction_page(State(state)).await.unwrap();
        let html = parse_html(response).await;

        for selector in [
            "input[name=amount]",
            "input[name=date]",
            "input[name=description]",
            "input[name=kind]",
            "select[name=category]",
        ] {
            let parsed = Selector::parse(selector).unwrap();
            assert!(
                html.select(&parsed).next().is_some(),
                "missing form field {selector}"
            );
        }
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let state = NewTransactionPageState {
            local_timezone: "Not/AZone".to_owned(),
        };

        let result = get_new_transaction_page(State(state)).await;

        assert!(result.is_err());
    }
}
