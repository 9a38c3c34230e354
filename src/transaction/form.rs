//! Shared form fields for creating and editing transactions.

use maud::{Markup, html};
use time::Date;

use crate::{
    catalog, endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::TransactionKind,
};

pub struct TransactionFormDefaults<'a> {
    pub kind: TransactionKind,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
}

/// Render the category dropdown with `selected` chosen.
///
/// A selected key that is not in the catalog still renders (and stays
/// selected) as an extra option labelled with the raw key, so editing an old
/// transaction never silently changes its category.
///
/// The element carries a stable ID so the category suggestion endpoint can
/// swap in a fresh copy with the suggested category selected.
pub fn category_select(selected: Option<&str>) -> Markup {
    let selected_is_unknown =
        selected.is_some_and(|key| catalog::get(key).is_none() && !key.is_empty());

    html! {
        select
            name="category"
            id="category-select"
            required
            class=(FORM_TEXT_INPUT_STYLE)
        {
            @if selected.is_none() {
                option value="" selected disabled { "Select a category" }
            }

            @for category in catalog::CATALOG {
                @if selected == Some(category.key) {
                    option value=(category.key) selected { (category.label) }
                } @else {
                    option value=(category.key) { (category.label) }
                }
            }

            @if selected_is_unknown {
                @if let Some(key) = selected {
                    option value=(key) selected { (catalog::resolve_label(key)) }
                }
            }
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let is_expense = matches!(defaults.kind, TransactionKind::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{:.2}", amount.abs()));
    let amount_placeholder = amount_str.as_deref().unwrap_or("0.01");

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-expense"
                        type="radio"
                        value="expense"
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-income"
                        type="radio"
                        value="income"
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="e.g. Coffee"
                minlength="2"
                required
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder=(amount_placeholder)
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category-select"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            div class="flex items-center gap-2"
            {
                (category_select(defaults.category))

                button
                    type="button"
                    title="Suggest a category from the description"
                    hx-post=(endpoints::SUGGEST_CATEGORY)
                    hx-include="#description"
                    hx-target="#category-select"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class="shrink-0 px-3 py-2.5 rounded border border-gray-300
                        dark:border-gray-600 text-sm font-medium text-gray-700
                        dark:text-white hover:bg-gray-100 dark:hover:bg-gray-700
                        cursor-pointer"
                {
                    "✨ Suggest"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::transaction::core::TransactionKind;

    use super::{TransactionFormDefaults, category_select, transaction_form_fields};

    fn render_fields(kind: TransactionKind) -> Html {
        let fields = transaction_form_fields(&TransactionFormDefaults {
            kind,
            amount: None,
            date: date!(2025 - 06 - 15),
            description: None,
            category: None,
        });
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }

    #[test]
    fn checks_selected_kind() {
        let cases = [
            (TransactionKind::Expense, "expense"),
            (TransactionKind::Income, "income"),
        ];

        for (kind, expected) in cases {
            let html = render_fields(kind);
            assert_checked_value(&html, expected);
        }
    }

    fn assert_checked_value(document: &Html, expected: &str) {
        let selector = Selector::parse("input[type=radio][name=kind]").unwrap();
        let inputs = document.select(&selector).collect::<Vec<_>>();
        assert_eq!(
            inputs.len(),
            2,
            "want 2 transaction kind inputs, got {}",
            inputs.len()
        );

        let checked = inputs
            .iter()
            .find(|input| input.value().attr("checked").is_some())
            .and_then(|input| input.value().attr("value"));
        assert_eq!(
            checked,
            Some(expected),
            "want checked transaction kind to be {expected}, got {checked:?}"
        );
    }

    #[test]
    fn category_select_lists_whole_catalog() {
        let markup = category_select(None);
        let html = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse("option").unwrap();
        let options = html.select(&selector).count();

        // The catalog plus the "Select a category" placeholder.
        assert_eq!(options, crate::catalog::CATALOG.len() + 1);
    }

    #[test]
    fn category_select_marks_selection() {
        let markup = category_select(Some("transport"));
        let html = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse("option[selected]").unwrap();
        let selected: Vec<_> = html
            .select(&selector)
            .filter_map(|option| option.value().attr("value"))
            .collect();

        assert_eq!(selected, vec!["transport"]);
    }

    #[test]
    fn category_select_keeps_unknown_keys() {
        let markup = category_select(Some("crypto_misc"));
        let html = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse("option[selected]").unwrap();
        let selected: Vec<_> = html
            .select(&selector)
            .filter_map(|option| option.value().attr("value"))
            .collect();

        assert_eq!(selected, vec!["crypto_misc"]);
    }
}
