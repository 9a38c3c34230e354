//! Summary cards for the dashboard and monthly reports.

use maud::{Markup, html};

use crate::{aggregation::Totals, html::format_currency};

/// Renders one summary card with a title and a currency amount.
fn summary_card(title: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col"
        {
            span class="text-sm text-gray-600 dark:text-gray-400" { (title) }

            span class={"text-2xl font-bold " (amount_style)}
            {
                (format_currency(amount))
            }
        }
    }
}

/// Renders the balance, income, and expense summary cards.
pub(crate) fn summary_cards(totals: &Totals) -> Markup {
    let balance_style = if totals.balance >= 0.0 {
        "text-gray-900 dark:text-white"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html! {
        section class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-6"
        {
            (summary_card("Balance", totals.balance, balance_style))
            (summary_card("Income", totals.income, "text-green-600 dark:text-green-400"))
            (summary_card("Expenses", totals.expenses, "text-red-600 dark:text-red-400"))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::aggregation::Totals;

    use super::summary_cards;

    #[test]
    fn renders_three_cards_with_amounts() {
        let totals = Totals {
            income: 100.0,
            expenses: 55.0,
            balance: 45.0,
        };

        let markup = summary_cards(&totals);
        let html = Html::parse_fragment(&markup.into_string());
        let text = html.root_element().text().collect::<String>();

        assert!(text.contains("$45.00"), "balance missing: {text}");
        assert!(text.contains("$100.00"), "income missing: {text}");
        assert!(text.contains("$55.00"), "expenses missing: {text}");

        let card_selector = Selector::parse("section > div").unwrap();
        assert_eq!(html.select(&card_selector).count(), 3);
    }
}
