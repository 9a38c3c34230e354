//! Dashboard module
//!
//! Provides an overview page showing the user's balance, income and expense
//! totals, a monthly overview chart, and their most recent transactions.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;

pub(crate) use cards::summary_cards;
pub(crate) use charts::{DashboardChart, charts_script, currency_formatter, currency_tooltip};
