//! The page listing a user's transactions as a sortable, filterable table.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::{self, SortDirection, SortKey, TableQuery, TablePage},
    catalog, endpoints,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    pagination::{PageIndicator, PaginationConfig, build_page_indicators},
    store::TransactionStore,
    transaction::core::{Transaction, TransactionKind},
    user::UserID,
};

/// The state needed to display the transactions page.
#[derive(Clone)]
pub struct TransactionsPageState {
    /// The store that holds the user's transactions.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters accepted by the transactions page.
#[derive(Debug, Deserialize)]
pub struct TransactionsViewQuery {
    /// The column to sort by: "date" (default) or "amount".
    pub sort: Option<String>,
    /// The sort direction: "asc" or "desc" (default).
    pub dir: Option<String>,
    /// Category keys to filter to. No values means no filter.
    #[serde(default)]
    pub category: Vec<String>,
    /// The 1-based page of results to show.
    pub page: Option<u64>,
}

impl TransactionsViewQuery {
    fn sort_key(&self) -> SortKey {
        match self.sort.as_deref() {
            Some("amount") => SortKey::Amount,
            _ => SortKey::Date,
        }
    }

    fn sort_direction(&self) -> SortDirection {
        match self.dir.as_deref() {
            Some("asc") => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }
}

/// Display a page with the user's transactions.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionsViewQuery>,
) -> Result<Response, Error> {
    let transactions = state.transaction_store.list(user_id, None)?;

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW);

    if transactions.is_empty() {
        return Ok(transactions_empty_view(nav_bar).into_response());
    }

    let sort = query.sort_key();
    let direction = query.sort_direction();
    let table_query = TableQuery {
        sort,
        direction,
        categories: query.category.clone(),
        page: query.page.unwrap_or(state.pagination_config.default_page),
        page_size: state.pagination_config.default_page_size,
    };
    let table_page = aggregation::project_table(&transactions, &table_query);

    Ok(transactions_view(
        nav_bar,
        &transactions,
        &table_page,
        &table_query,
        state.pagination_config.max_pages,
    )
    .into_response())
}

/// Build the URL for this page with the given sort, filter, and page state.
fn view_url(
    sort: SortKey,
    direction: SortDirection,
    categories: &[String],
    page: u64,
) -> String {
    let sort_value = match sort {
        SortKey::Date => "date",
        SortKey::Amount => "amount",
    };
    let dir_value = match direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };

    let mut pairs: Vec<(&str, String)> = vec![
        ("sort", sort_value.to_owned()),
        ("dir", dir_value.to_owned()),
        ("page", page.to_string()),
    ];
    for category in categories {
        pairs.push(("category", category.clone()));
    }

    match serde_urlencoded::to_string(&pairs) {
        Ok(query_string) => format!("{}?{}", endpoints::TRANSACTIONS_VIEW, query_string),
        Err(error) => {
            tracing::warn!("could not encode transactions view URL: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

fn transactions_empty_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "add your first transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "No transactions yet" }

            p
            {
                "Start tracking your finances: " (new_transaction_link) "."
            }
        }
    );

    base("Transactions", &[], &content)
}

/// A column header that toggles the sort when clicked.
fn sortable_column_header(
    title: &str,
    column: SortKey,
    current_sort: SortKey,
    current_direction: SortDirection,
    categories: &[String],
) -> Markup {
    let is_active = column == current_sort;
    let direction = if is_active {
        current_direction.toggled()
    } else {
        SortDirection::Descending
    };
    let indicator = match (is_active, current_direction) {
        (false, _) => "",
        (true, SortDirection::Ascending) => " ▲",
        (true, SortDirection::Descending) => " ▼",
    };
    let url = view_url(column, direction, categories, 1);

    html!(
        th scope="col" class="px-6 py-3"
        {
            a href=(url) class="hover:underline" { (title) (indicator) }
        }
    )
}

fn category_filter_panel(
    transactions: &[Transaction],
    query: &TableQuery,
) -> Markup {
    // Keys no longer in the catalog still get a checkbox so old data can be
    // filtered on.
    let mut unknown_keys: Vec<&str> = transactions
        .iter()
        .map(|transaction| transaction.category.as_str())
        .filter(|key| catalog::get(key).is_none())
        .collect();
    unknown_keys.sort_unstable();
    unknown_keys.dedup();

    let sort_value = match query.sort {
        SortKey::Date => "date",
        SortKey::Amount => "amount",
    };
    let dir_value = match query.direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };

    let checkbox = |key: &str, label: &str| -> Markup {
        let checked = query.categories.iter().any(|selected| selected == key);
        html!(
            label class="flex items-center space-x-2"
            {
                input
                    type="checkbox"
                    name="category"
                    value=(key)
                    checked[checked]
                    class="rounded-sm border-gray-300 text-blue-600";

                span class=(CATEGORY_BADGE_STYLE) { (label) }
            }
        )
    };

    html!(
        details class="w-full mb-4" open[!query.categories.is_empty()]
        {
            summary class="cursor-pointer text-sm font-semibold mb-2" { "Filter by category" }

            form
                method="get"
                action=(endpoints::TRANSACTIONS_VIEW)
                class="bg-gray-50 dark:bg-gray-800 p-4 rounded-lg"
            {
                input type="hidden" name="sort" value=(sort_value);
                input type="hidden" name="dir" value=(dir_value);

                div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-3 mb-3"
                {
                    @for category in catalog::CATALOG {
                        (checkbox(category.key, category.label))
                    }

                    @for key in &unknown_keys {
                        (checkbox(key, catalog::resolve_label(key)))
                    }
                }

                div class="flex gap-3"
                {
                    button
                        type="submit"
                        class="px-4 py-2 bg-blue-500 dark:bg-blue-600 text-white rounded text-sm"
                    {
                        "Apply"
                    }

                    a
                        href=(endpoints::TRANSACTIONS_VIEW)
                        class=(LINK_STYLE)
                    {
                        "Clear filters"
                    }
                }
            }
        }
    )
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (amount_text, amount_style) = match transaction.kind {
        TransactionKind::Income => (
            format_currency(transaction.amount),
            "text-green-600 dark:text-green-400",
        ),
        TransactionKind::Expense => (
            format_currency(-transaction.amount),
            "text-red-600 dark:text-red-400",
        ),
    };
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE)
                {
                    (catalog::resolve_label(&transaction.category))
                }
            }
            td class={(TABLE_CELL_STYLE) " font-medium " (amount_style)} { (amount_text) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
            }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-confirm="Delete this transaction?"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}

fn pagination_nav(table_page: &TablePage, query: &TableQuery, max_pages: u64) -> Markup {
    if table_page.page_count <= 1 {
        return html! {};
    }

    let indicators = build_page_indicators(table_page.page, table_page.page_count, max_pages);
    let page_link = |page: u64, text: String, is_current: bool| -> Markup {
        let url = view_url(query.sort, query.direction, &query.categories, page);
        let style = if is_current {
            "px-3 py-1 rounded bg-blue-600 text-white"
        } else {
            "px-3 py-1 rounded hover:bg-gray-100 dark:hover:bg-gray-700"
        };

        html!( a href=(url) class=(style) { (text) } )
    };

    html!(
        nav class="flex items-center gap-1 mt-4 text-sm" aria-label="Pagination"
        {
            @for indicator in indicators {
                @match indicator {
                    PageIndicator::BackButton(page) => { (page_link(page, "Back".to_owned(), false)) }
                    PageIndicator::NextButton(page) => { (page_link(page, "Next".to_owned(), false)) }
                    PageIndicator::Page(page) => { (page_link(page, page.to_string(), false)) }
                    PageIndicator::CurrPage(page) => { (page_link(page, page.to_string(), true)) }
                    PageIndicator::Ellipsis => span class="px-2" { "…" }
                }
            }
        }
    )
}

fn transactions_view(
    nav_bar: NavBar,
    transactions: &[Transaction],
    table_page: &TablePage,
    query: &TableQuery,
    max_pages: u64,
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="w-full flex items-center justify-between mb-4"
            {
                h1 class="text-xl font-bold" { "Transactions" }

                a
                    href=(endpoints::NEW_TRANSACTION_VIEW)
                    class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                        hover:dark:bg-blue-700 text-white rounded text-sm"
                {
                    "Add Transaction"
                }
            }

            (category_filter_panel(transactions, query))

            @if table_page.rows.is_empty() {
                p class="py-8" { "No transactions match the selected filters." }
            } @else {
                div class="w-full overflow-x-auto rounded-lg shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                (sortable_column_header("Date", SortKey::Date, query.sort, query.direction, &query.categories))
                                th scope="col" class="px-6 py-3" { "Description" }
                                th scope="col" class="px-6 py-3" { "Category" }
                                (sortable_column_header("Amount", SortKey::Amount, query.sort, query.direction, &query.categories))
                                th scope="col" class="px-6 py-3" { "" }
                                th scope="col" class="px-6 py-3" { "" }
                            }
                        }

                        tbody
                        {
                            @for transaction in &table_page.rows {
                                (transaction_row(transaction))
                            }
                        }
                    }
                }

                (pagination_nav(table_page, query, max_pages))
            }
        }
    );

    base("Transactions", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, Router, routing::get};
    use axum_test::TestServer;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        endpoints,
        pagination::PaginationConfig,
        store::{TransactionStore, memory::MemoryTransactionStore},
        transaction::core::{TransactionDraft, TransactionKind},
        user::UserID,
    };

    use super::{TransactionsPageState, get_transactions_page};

    fn get_test_server(store: Arc<MemoryTransactionStore>, page_size: u64) -> TestServer {
        let state = TransactionsPageState {
            transaction_store: store,
            pagination_config: PaginationConfig {
                default_page: 1,
                default_page_size: page_size,
                max_pages: 5,
            },
        };

        let app = Router::new()
            .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
            .layer(Extension(UserID::new(1)))
            .with_state(state);

        TestServer::new(app)
    }

    fn seed_store() -> Arc<MemoryTransactionStore> {
        let store = Arc::new(MemoryTransactionStore::new());
        let owner = UserID::new(1);
        let entries = [
            (50.0, TransactionKind::Expense, "food", date!(2025 - 06 - 01)),
            (20.0, TransactionKind::Expense, "transport", date!(2025 - 06 - 02)),
            (900.0, TransactionKind::Income, "work", date!(2025 - 06 - 03)),
        ];

        for (amount, kind, category, date) in entries {
            store
                .create(
                    TransactionDraft::new(owner, amount, kind, category, "seeded", date).unwrap(),
                )
                .unwrap();
        }

        store
    }

    fn row_amount_cells(html: &Html) -> Vec<String> {
        let selector = Selector::parse("tbody tr td:nth-child(4)").unwrap();
        html.select(&selector)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn lists_transactions_newest_first_by_default() {
        let server = get_test_server(seed_store(), 20);

        let response = server.get(endpoints::TRANSACTIONS_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        let amounts = row_amount_cells(&html);
        assert_eq!(amounts, vec!["$900.00", "-$20.00", "-$50.00"]);
    }

    #[tokio::test]
    async fn sorts_by_amount_ascending() {
        let server = get_test_server(seed_store(), 20);

        let response = server
            .get(endpoints::TRANSACTIONS_VIEW)
            .add_query_param("sort", "amount")
            .add_query_param("dir", "asc")
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        let amounts = row_amount_cells(&html);
        assert_eq!(amounts, vec!["-$20.00", "-$50.00", "$900.00"]);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let server = get_test_server(seed_store(), 20);

        let response = server
            .get(endpoints::TRANSACTIONS_VIEW)
            .add_query_param("category", "food")
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        let amounts = row_amount_cells(&html);
        assert_eq!(amounts, vec!["-$50.00"]);
    }

    #[tokio::test]
    async fn paginates_results() {
        let server = get_test_server(seed_store(), 2);

        let response = server
            .get(endpoints::TRANSACTIONS_VIEW)
            .add_query_param("page", "2")
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(row_amount_cells(&html).len(), 1);

        let nav_selector = Selector::parse("nav[aria-label=Pagination]").unwrap();
        assert!(html.select(&nav_selector).next().is_some());
    }

    #[test]
    fn query_deserializes_repeated_category_params() {
        let query: super::TransactionsViewQuery =
            serde_html_form::from_str("sort=amount&dir=asc&category=food&category=transport")
                .unwrap();

        assert_eq!(query.category, vec!["food", "transport"]);

        let query: super::TransactionsViewQuery = serde_html_form::from_str("").unwrap();
        assert!(query.category.is_empty());
    }

    #[tokio::test]
    async fn shows_empty_state_with_no_transactions() {
        let server = get_test_server(Arc::new(MemoryTransactionStore::new()), 20);

        let response = server.get(endpoints::TRANSACTIONS_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("No transactions yet"));
    }
}
