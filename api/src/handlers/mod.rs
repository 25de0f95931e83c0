//! HTTP handlers
//!
//! Axum request handlers for the API endpoints. Handlers only translate
//! between JSON and service calls; every rule lives in `app`.

pub mod borrowers;
pub mod loans;
pub mod reports;
pub mod titles;

pub use borrowers::{
    borrower_history, get_borrower, list_borrowers, lookup_borrower, register_borrower,
    update_contact,
};
pub use loans::{get_loan, issue_loan, list_active_loans, return_loan};
pub use reports::{overdue_report, statistics_report};
pub use titles::{create_title, get_title, list_titles, restock_title};
