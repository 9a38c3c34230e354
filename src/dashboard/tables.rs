//! The recent transactions list shown on the dashboard.

use maud::{Markup, html};

use crate::{
    catalog, endpoints,
    html::{CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency, link},
    transaction::{Transaction, TransactionKind},
};

/// Renders a compact table of the user's most recent transactions.
///
/// `transactions` is expected in the store's newest-first order; the caller
/// decides how many to show.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full"
        {
            div class="flex items-baseline justify-between mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }

                (link(endpoints::TRANSACTIONS_VIEW, "View all"))
            }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    tbody
                    {
                        @for transaction in transactions {
                            (recent_transaction_row(transaction))
                        }
                    }
                }
            }
        }
    }
}

fn recent_transaction_row(transaction: &Transaction) -> Markup {
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

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                div class="font-medium text-gray-900 dark:text-white" { (transaction.description) }
                div class="text-xs" { (transaction.date) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE)
                {
                    (catalog::resolve_label(&transaction.category))
                }
            }
            td class={(TABLE_CELL_STYLE) " text-right font-medium " (amount_style)}
            {
                (amount_text)
            }
        }
    }
}
