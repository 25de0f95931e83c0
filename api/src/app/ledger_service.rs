//! Lending ledger
//!
//! Owns the loan lifecycle `Issued -> Returned` and is the only writer of a
//! title's availability counter. Both transitions are delegated to the
//! store as single atomic operations; this service validates inputs, reads
//! the clock and computes charges.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    ActiveLoan, BorrowerId, Loan, LoanId, Money, NewLoan, ReturnCharges, ReturnRecord, TitleId,
};
use crate::domain::ports::{BorrowerRepository, Clock, LoanRepository, TitleRepository};
use crate::error::{AppError, DomainError};

use super::charges::{due_date, late_fee, LoanPolicy};

/// Result of a successful return
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReturnOutcome {
    pub loan: Loan,
    pub charges: ReturnCharges,
}

/// Service for issuing and returning books
pub struct LedgerService<TR, BR, LR>
where
    TR: TitleRepository + ?Sized,
    BR: BorrowerRepository + ?Sized,
    LR: LoanRepository + ?Sized,
{
    titles: Arc<TR>,
    borrowers: Arc<BR>,
    loans: Arc<LR>,
    clock: Arc<dyn Clock>,
    policy: LoanPolicy,
}

impl<TR, BR, LR> LedgerService<TR, BR, LR>
where
    TR: TitleRepository + ?Sized,
    BR: BorrowerRepository + ?Sized,
    LR: LoanRepository + ?Sized,
{
    pub fn new(titles: Arc<TR>, borrowers: Arc<BR>, loans: Arc<LR>, clock: Arc<dyn Clock>) -> Self {
        Self {
            titles,
            borrowers,
            loans,
            clock,
            policy: LoanPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LoanPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn today(&self) -> chrono::NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Lend one copy of a title to a borrower.
    ///
    /// `loan_days` falls back to the configured default. Fails with
    /// `BorrowerNotFound`, `TitleNotFound` or `NoCopiesAvailable` without
    /// touching any state.
    pub async fn issue_book(
        &self,
        title_id: &TitleId,
        borrower_id: &BorrowerId,
        loan_days: Option<i64>,
    ) -> Result<Loan, AppError> {
        let loan_days = loan_days.unwrap_or(i64::from(self.policy.default_loan_days));
        let issue_date = self.today();
        let due = due_date(issue_date, loan_days)?;

        if self.borrowers.find_by_id(borrower_id).await?.is_none() {
            tracing::warn!(borrower_id = %borrower_id, "Issue rejected: unknown borrower");
            return Err(DomainError::BorrowerNotFound(*borrower_id).into());
        }

        let loan = self
            .loans
            .open(&NewLoan {
                title_id: *title_id,
                borrower_id: *borrower_id,
                issue_date,
                due_date: due,
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(title_id = %title_id, borrower_id = %borrower_id, error = %e, "Issue rejected");
            })?;

        tracing::info!(
            loan_id = %loan.id,
            title_id = %title_id,
            borrower_id = %borrower_id,
            due_date = %loan.due_date,
            "Book issued"
        );
        Ok(loan)
    }

    /// Take a copy back, settling the late fee and the damage charge.
    ///
    /// The damage charge is whatever the caller says it is; only negative
    /// amounts are refused.
    pub async fn return_book(
        &self,
        loan_id: &LoanId,
        damage_charge: Money,
    ) -> Result<ReturnOutcome, AppError> {
        if damage_charge.is_negative() {
            return Err(DomainError::Validation(format!(
                "Damage charge cannot be negative, got {}",
                damage_charge
            ))
            .into());
        }

        let loan = self
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(DomainError::LoanNotFound(*loan_id))?;
        if !loan.is_open() {
            tracing::warn!(loan_id = %loan_id, "Return rejected: already returned");
            return Err(DomainError::LoanAlreadyReturned(*loan_id).into());
        }

        let returned_on = self.today();
        let record = ReturnRecord {
            return_date: returned_on,
            late_fee: late_fee(loan.due_date, returned_on, self.policy.late_fee_per_day),
            damage_charge,
        };

        // The store re-checks the status atomically; a racing return loses there.
        let loan = self.loans.close(loan_id, &record).await.inspect_err(|e| {
            tracing::warn!(loan_id = %loan_id, error = %e, "Return rejected");
        })?;
        let charges = ReturnCharges::new(record.late_fee, record.damage_charge);

        tracing::info!(
            loan_id = %loan_id,
            title_id = %loan.title_id,
            late_fee = %charges.late_fee,
            damage_charge = %charges.damage_charge,
            "Book returned"
        );
        Ok(ReturnOutcome { loan, charges })
    }

    /// Look up a loan, failing with `LoanNotFound`
    pub async fn get_loan(&self, loan_id: &LoanId) -> Result<Loan, AppError> {
        Ok(self
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(DomainError::LoanNotFound(*loan_id))?)
    }

    /// Open loans, newest issue date first, with display names
    pub async fn active_loans(&self) -> Result<Vec<ActiveLoan>, AppError> {
        let mut loans = self.loans.list_open().await?;
        loans.sort_by(|a, b| b.issue_date.cmp(&a.issue_date).then(a.id.cmp(&b.id)));

        let titles: HashMap<TitleId, String> = self
            .titles
            .list()
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let borrowers: HashMap<BorrowerId, String> = self
            .borrowers
            .list()
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        tracing::debug!(count = loans.len(), "Listing active loans");
        Ok(loans
            .into_iter()
            .map(|loan| ActiveLoan {
                title_name: titles.get(&loan.title_id).cloned().unwrap_or_default(),
                borrower_name: borrowers.get(&loan.borrower_id).cloned().unwrap_or_default(),
                loan,
            })
            .collect())
    }
}
