//! Pure transaction aggregation and view derivation.
//!
//! Provides functions to sum income and expenses, group transactions by
//! calendar month and by category, scope a list to a date range, and project
//! a sorted/filtered/paginated table view.
//!
//! Every function here is a total, synchronous function over an in-memory
//! transaction list: no I/O, no hidden state, and no error path. Input is
//! assumed well-formed (validation happens when transactions are created)
//! and the same input always produces the same output. Amounts accumulate as
//! `f64` and are only rounded at presentation time by the currency
//! formatter, so rounding error does not compound across buckets.

use std::collections::HashMap;

use time::Date;

use crate::{
    catalog,
    transaction::{Transaction, TransactionKind},
};

/// Income and expense totals with their balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts, as a positive magnitude.
    pub expenses: f64,
    /// `income - expenses`.
    pub balance: f64,
}

/// Sum income and expenses over `transactions`.
///
/// Returns all zeros for an empty list. The result does not depend on the
/// order of the input.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let mut income = 0.0;
    let mut expenses = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income += transaction.amount,
            TransactionKind::Expense => expenses += transaction.amount,
        }
    }

    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// The month, represented as its first day.
    pub month: Date,
    /// The sum of income amounts in the month.
    pub income: f64,
    /// The sum of expense amounts in the month, as a positive magnitude.
    pub expenses: f64,
}

/// Group `transactions` into per-month income and expense totals.
///
/// The bucket key is the (calendar year, calendar month) of the transaction
/// date; two transactions in the same month always merge into one bucket
/// regardless of day. Buckets are sorted ascending by month so the output
/// reads oldest to newest for charting, independent of the input order.
pub fn group_by_month(transactions: &[Transaction]) -> Vec<MonthBucket> {
    let mut totals: HashMap<Date, (f64, f64)> = HashMap::new();

    for transaction in transactions {
        let month = transaction.date.replace_day(1).unwrap();
        let entry = totals.entry(month).or_insert((0.0, 0.0));

        match transaction.kind {
            TransactionKind::Income => entry.0 += transaction.amount,
            TransactionKind::Expense => entry.1 += transaction.amount,
        }
    }

    let mut buckets: Vec<MonthBucket> = totals
        .into_iter()
        .map(|(month, (income, expenses))| MonthBucket {
            month,
            income,
            expenses,
        })
        .collect();
    buckets.sort_by_key(|bucket| bucket.month);

    buckets
}

/// The total amount for one category label.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    /// The resolved display label, or the raw category key if the key is not
    /// in the catalog.
    pub label: String,
    /// The sum of amounts for this label.
    pub total: f64,
}

/// Group transactions of the given `kind` into per-category totals.
///
/// Transactions are bucketed by their resolved display label: keys in the
/// catalog bucket under the catalog label, unknown keys bucket under the raw
/// key verbatim. Unknown categories are never dropped or merged into the
/// fallback category.
///
/// The output is sorted descending by total; ties keep the order the label
/// was first encountered in, so the result is deterministic.
pub fn group_by_category(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Vec::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        let label = catalog::resolve_label(&transaction.category);

        match buckets.iter_mut().find(|bucket| bucket.label == label) {
            Some(bucket) => bucket.total += transaction.amount,
            None => buckets.push(CategoryBucket {
                label: label.to_string(),
                total: transaction.amount,
            }),
        }
    }

    // sort_by is stable, so equal totals keep first-encountered order.
    buckets.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    buckets
}

/// Keep the transactions dated within `start..=end`.
///
/// Both bounds are inclusive: a transaction dated exactly `start` or `end`
/// is kept. Callers scope a report to a calendar month by passing the first
/// and last day of the month.
pub fn filter_by_date_range(transactions: &[Transaction], start: Date, end: Date) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| start <= transaction.date && transaction.date <= end)
        .cloned()
        .collect()
}

/// The column a table projection is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Sort by transaction date.
    Date,
    /// Sort by transaction amount.
    Amount,
}

/// The direction a table projection is sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

impl SortDirection {
    /// The opposite direction, used by column headers to toggle the sort.
    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// How to sort, filter, and page a table projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    /// The column to sort by.
    pub sort: SortKey,
    /// The direction to sort in.
    pub direction: SortDirection,
    /// Category keys to keep. An empty selection means no filter is active
    /// and every row is kept.
    pub categories: Vec<String>,
    /// The 1-based page to return. Out-of-range pages are clamped.
    pub page: u64,
    /// The number of rows per page.
    pub page_size: u64,
}

/// One page of a table projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    /// The rows on this page, in display order.
    pub rows: Vec<Transaction>,
    /// The 1-based page number actually returned, after clamping.
    pub page: u64,
    /// The total number of pages. At least 1, even with no rows.
    pub page_count: u64,
    /// The number of rows matching the filter across all pages.
    pub total_rows: usize,
}

/// Project `transactions` into one sorted, filtered page of table rows.
///
/// Sorting is stable: rows with equal sort keys keep their relative order
/// from the input. The category filter keeps rows whose category key is in
/// the selected set, or every row when the selection is empty. The page
/// number is clamped to the valid range so that stale links (e.g. after
/// deleting rows) still render the last page.
///
/// This operates purely on the in-memory list; it has no storage or network
/// side effects.
pub fn project_table(transactions: &[Transaction], query: &TableQuery) -> TablePage {
    let mut rows: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| {
            query.categories.is_empty() || query.categories.contains(&transaction.category)
        })
        .cloned()
        .collect();

    // Vec::sort_by is stable, which keeps equal keys in input order.
    rows.sort_by(|a, b| {
        let ordering = match query.sort {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a
                .amount
                .partial_cmp(&b.amount)
                .unwrap_or(std::cmp::Ordering::Equal),
        };

        match query.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let total_rows = rows.len();
    let page_size = query.page_size.max(1);
    let page_count = (total_rows as u64).div_ceil(page_size).max(1);
    let page = query.page.clamp(1, page_count);

    let start = ((page - 1) * page_size) as usize;
    let end = (start + page_size as usize).min(total_rows);
    let rows = rows[start..end].to_vec();

    TablePage {
        rows,
        page,
        page_count,
        total_rows,
    }
}
