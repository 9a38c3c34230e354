//! Report HTTP handlers and view rendering.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, aggregation,
    aggregation::CategoryBucket,
    dashboard::{DashboardChart, charts_script, summary_cards},
    endpoints,
    html::{
        HeadElement, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    report::{charts::category_spending_chart, month::ReportMonth},
    store::TransactionStore,
    timezone::local_today,
    transaction::TransactionKind,
    user::UserID,
};

/// The state needed for displaying the reports page.
#[derive(Clone)]
pub struct ReportState {
    /// The store that holds the user's transactions.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the reports page.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// The month to report on, as "YYYY-MM". Defaults to the current month.
    pub month: Option<String>,
}

/// Display the monthly report page.
///
/// The report is derived by scoping the user's full transaction list to the
/// selected month and aggregating the scoped list.
pub async fn get_reports_page(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let current_month = ReportMonth::from_date(today);

    let selected_month = query
        .month
        .as_deref()
        .and_then(ReportMonth::parse)
        .unwrap_or(current_month);

    let transactions = state
        .transaction_store
        .list(user_id, None)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let monthly = aggregation::filter_by_date_range(
        &transactions,
        selected_month.first_day(),
        selected_month.last_day(),
    );

    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW);
    // Months after the current one have no data yet, so the UI stops there.
    let next_month_allowed = selected_month.next().first_day() <= today;

    Ok(report_view(nav_bar, selected_month, next_month_allowed, &monthly).into_response())
}

fn month_url(month: ReportMonth) -> String {
    format!("{}?month={}", endpoints::REPORTS_VIEW, month.query_value())
}

fn month_navigation(selected_month: ReportMonth, next_month_allowed: bool) -> Markup {
    let nav_button_style = "px-3 py-1 rounded border border-gray-300 dark:border-gray-600 \
        hover:bg-gray-100 dark:hover:bg-gray-700";
    let disabled_style = "px-3 py-1 rounded border border-gray-200 dark:border-gray-700 \
        text-gray-400 dark:text-gray-600 cursor-not-allowed";

    html!(
        div class="flex items-center justify-center gap-4 mb-6"
        {
            a
                href=(month_url(selected_month.previous()))
                aria-label="Previous month"
                class=(nav_button_style)
            {
                "←"
            }

            h2 class="text-xl font-semibold text-center w-48" { (selected_month.title()) }

            @if next_month_allowed {
                a
                    href=(month_url(selected_month.next()))
                    aria-label="Next month"
                    class=(nav_button_style)
                {
                    "→"
                }
            } @else {
                span aria-label="Next month" aria-disabled="true" class=(disabled_style) { "→" }
            }
        }
    )
}

fn category_table(categories: &[CategoryBucket], expense_total: f64) -> Markup {
    html!(
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class="px-6 py-3" { "Category" }
                        th scope="col" class="px-6 py-3" { "Total" }
                        th scope="col" class="px-6 py-3" { "Share" }
                    }
                }

                tbody
                {
                    @for bucket in categories {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (bucket.label) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(bucket.total)) }
                            td class=(TABLE_CELL_STYLE) { (percent_of(bucket.total, expense_total)) "%" }
                        }
                    }
                }
            }
        }
    )
}

fn percent_of(value: f64, total: f64) -> i64 {
    if total == 0.0 {
        0
    } else {
        ((value / total) * 100.0).round() as i64
    }
}

fn report_empty_view(selected_month: ReportMonth) -> Markup {
    html!(
        div class="flex flex-col items-center py-16"
        {
            h3 class="text-xl font-bold" { "No data for this month" }

            p
            {
                "There are no transactions recorded for " (selected_month.title()) "."
            }
        }
    )
}

fn report_view(
    nav_bar: NavBar,
    selected_month: ReportMonth,
    next_month_allowed: bool,
    monthly_transactions: &[crate::transaction::Transaction],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let (report_body, chart) = if monthly_transactions.is_empty() {
        (report_empty_view(selected_month), None)
    } else {
        let totals = aggregation::compute_totals(monthly_transactions);
        let categories =
            aggregation::group_by_category(monthly_transactions, TransactionKind::Expense);
        let chart = (!categories.is_empty()).then(|| DashboardChart {
            id: "category-spending-chart",
            options: category_spending_chart(&categories).to_string(),
        });

        let markup = html!(
            (summary_cards(&totals))

            @if let Some(chart) = &chart {
                section
                    id="charts"
                    class="w-full mx-auto mb-6"
                {
                    div
                        id=(chart.id)
                        class="min-h-[400px] rounded dark:bg-gray-100"
                    {}
                }

                (category_table(&categories, totals.expenses))
            } @else {
                p class="py-4" { "No expenses this month." }
            }
        );

        (markup, chart)
    };

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="w-full flex items-center justify-between mb-4"
            {
                h1 class="text-xl font-bold" { "Reports" }
            }

            (month_navigation(selected_month, next_month_allowed))

            (report_body)
        }
    );

    let scripts = match chart {
        Some(chart) => vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(&[chart]),
        ],
        None => Vec::new(),
    };

    base("Reports", &scripts, &content)
}
