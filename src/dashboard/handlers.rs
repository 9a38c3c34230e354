//! Dashboard HTTP handlers and view rendering.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, aggregation, endpoints,
    dashboard::{
        cards::summary_cards,
        charts::{DashboardChart, charts_script, overview_chart},
        tables::recent_transactions_table,
    },
    html::{HeadElement, base, link},
    navigation::NavBar,
    store::TransactionStore,
    transaction::Transaction,
    user::UserID,
};

/// How many transactions the recent transactions list shows.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// The store that holds the user's transactions.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .list(user_id, None)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    Ok(dashboard_view(nav_bar, &transactions).into_response())
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding your first transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Summaries and charts will show up here once you add some
                transactions. Start by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with summary cards, the overview chart,
/// and the recent transactions list.
fn dashboard_view(nav_bar: NavBar, transactions: &[Transaction]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let totals = aggregation::compute_totals(transactions);
    let months = aggregation::group_by_month(transactions);
    let chart = DashboardChart {
        id: "overview-chart",
        options: overview_chart(&months).to_string(),
    };
    // The store delivers newest first, so the head of the list is the most
    // recent activity.
    let recent = &transactions[..transactions.len().min(RECENT_TRANSACTION_COUNT)];

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="w-full flex items-center justify-between mb-4"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                a
                    href=(endpoints::NEW_TRANSACTION_VIEW)
                    class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                        hover:dark:bg-blue-700 text-white rounded text-sm"
                {
                    "Add Transaction"
                }
            }

            (summary_cards(&totals))

            section
                id="charts"
                class="w-full mx-auto mb-6"
            {
                div
                    id=(chart.id)
                    class="min-h-[380px] rounded dark:bg-gray-100"
                {}
            }

            (recent_transactions_table(recent))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&[chart]),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        store::{TransactionStore, memory::MemoryTransactionStore},
        transaction::{TransactionDraft, TransactionKind},
        user::UserID,
    };

    use super::{DashboardState, get_dashboard_page};

    async fn render(state: DashboardState, owner: UserID) -> (StatusCode, Html) {
        let response = get_dashboard_page(State(state), Extension(owner))
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, Html::parse_document(&String::from_utf8_lossy(&body)))
    }

    #[tokio::test]
    async fn dashboard_page_shows_cards_chart_and_recent_transactions() {
        let store = Arc::new(MemoryTransactionStore::new());
        let owner = UserID::new(1);
        store
            .create(
                TransactionDraft::new(
                    owner,
                    100.0,
                    TransactionKind::Income,
                    "work",
                    "salary",
                    date!(2025 - 01 - 05),
                )
                .unwrap(),
            )
            .unwrap();
        store
            .create(
                TransactionDraft::new(
                    owner,
                    40.0,
                    TransactionKind::Expense,
                    "food",
                    "groceries",
                    date!(2025 - 01 - 10),
                )
                .unwrap(),
            )
            .unwrap();

        let state = DashboardState {
            transaction_store: store,
        };
        let (status, html) = render(state, owner).await;

        assert_eq!(status, StatusCode::OK);

        let chart_selector = Selector::parse("#overview-chart").unwrap();
        assert!(html.select(&chart_selector).next().is_some(), "chart missing");

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("$60.00"), "balance missing: {text}");
        assert!(text.contains("Recent Transactions"));
        assert!(text.contains("groceries"));
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let state = DashboardState {
            transaction_store: Arc::new(MemoryTransactionStore::new()),
        };

        let (status, html) = render(state, UserID::new(1)).await;

        assert_eq!(status, StatusCode::OK);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Nothing here yet"));
    }

    #[tokio::test]
    async fn recent_transactions_are_capped_at_five() {
        let store = Arc::new(MemoryTransactionStore::new());
        let owner = UserID::new(1);
        for day in 1..=7u8 {
            store
                .create(
                    TransactionDraft::new(
                        owner,
                        day as f64,
                        TransactionKind::Expense,
                        "food",
                        &format!("purchase {day}"),
                        date!(2025 - 01 - 01).replace_day(day).unwrap(),
                    )
                    .unwrap(),
                )
                .unwrap();
        }

        let state = DashboardState {
            transaction_store: store,
        };
        let (_, html) = render(state, owner).await;

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 5);
    }
}
