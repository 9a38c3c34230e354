//! Monthly reports with category breakdowns.
//!
//! A report scopes the user's transactions to one calendar month and derives
//! totals and per-category spending from the scoped list.

mod charts;
mod handlers;
mod month;

pub use handlers::get_reports_page;
