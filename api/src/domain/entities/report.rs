//! Read-side report models
//!
//! Derived views over the catalog and ledger. Never a source of truth.

use chrono::NaiveDate;
use serde::Serialize;

use super::loan::{Loan, LoanId, LoanStatus, ReturnCharges};

/// Library-wide counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStatistics {
    pub total_titles: u64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub total_borrowers: u64,
    pub active_loans: u64,
    pub overdue_loans: u64,
}

/// An open loan joined with display names
#[derive(Debug, Clone, Serialize)]
pub struct ActiveLoan {
    #[serde(flatten)]
    pub loan: Loan,
    pub title_name: String,
    pub borrower_name: String,
}

/// An overdue loan with its lateness as of the query date
#[derive(Debug, Clone, Serialize)]
pub struct OverdueLoan {
    pub loan_id: LoanId,
    pub title_name: String,
    pub borrower_name: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub days_overdue: i64,
}

/// One row of a borrower's loan history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub loan_id: LoanId,
    pub title_name: String,
    pub author: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    /// Present once the loan has been returned
    pub charges: Option<ReturnCharges>,
}
