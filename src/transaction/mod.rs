//! Transaction management for the application.
//!
//! This module contains everything related to transactions:
//! - The [Transaction] model and [TransactionDraft] for validated creation
//! - View handlers for transaction-related web pages
//! - Endpoints for creating, editing, and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod new_transaction_page;
mod transactions_page;

pub use core::{
    Transaction, TransactionDraft, TransactionKind, create_transaction_table, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use form::category_select;
pub use new_transaction_page::get_new_transaction_page;
pub use transactions_page::get_transactions_page;
