//! The spending-by-category chart for monthly reports.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisType},
    series::Bar,
};

use crate::{
    aggregation::CategoryBucket,
    dashboard::{currency_formatter, currency_tooltip},
};

/// Builds a horizontal bar chart of expense totals per category.
///
/// The buckets are expected sorted descending by total (as produced by
/// [crate::aggregation::group_by_category]); the axis order is reversed so
/// the biggest category renders at the top of the chart.
pub(super) fn category_spending_chart(categories: &[CategoryBucket]) -> Chart {
    let labels: Vec<String> = categories
        .iter()
        .rev()
        .map(|bucket| bucket.label.clone())
        .collect();
    let totals: Vec<f64> = categories.iter().rev().map(|bucket| bucket.total).collect();

    Chart::new()
        .title(Title::new().text("Spending by Category"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .y_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(Bar::new().name("Spending").data(totals))
}
