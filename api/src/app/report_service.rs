//! Read-side reports over the catalog and the ledger
//!
//! Each report reads the stores it needs once; results are consistent per
//! store read, not across the whole report.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    BorrowerId, HistoryEntry, LibraryStatistics, OverdueLoan, Title, TitleId,
};
use crate::domain::ports::{BorrowerRepository, Clock, LoanRepository, TitleRepository};
use crate::error::{AppError, DomainError};

/// Service for library reports
pub struct ReportService<TR, BR, LR>
where
    TR: TitleRepository + ?Sized,
    BR: BorrowerRepository + ?Sized,
    LR: LoanRepository + ?Sized,
{
    titles: Arc<TR>,
    borrowers: Arc<BR>,
    loans: Arc<LR>,
    clock: Arc<dyn Clock>,
}

impl<TR, BR, LR> ReportService<TR, BR, LR>
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
        }
    }

    async fn titles_by_id(&self) -> Result<HashMap<TitleId, Title>, DomainError> {
        Ok(self
            .titles
            .list()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect())
    }

    pub async fn statistics(&self) -> Result<LibraryStatistics, AppError> {
        let today = self.clock.utc().date_naive();
        let titles = self.titles.list().await?;
        let total_borrowers = self.borrowers.count().await?;
        let open = self.loans.list_open().await?;

        let stats = LibraryStatistics {
            total_titles: titles.len() as u64,
            total_copies: titles.iter().map(|t| i64::from(t.total_copies)).sum(),
            available_copies: titles.iter().map(|t| i64::from(t.available_copies)).sum(),
            total_borrowers,
            active_loans: open.len() as u64,
            overdue_loans: open.iter().filter(|l| l.is_overdue(today)).count() as u64,
        };

        tracing::debug!(?stats, "Computed library statistics");
        Ok(stats)
    }

    /// Overdue loans, most overdue first, ties broken by loan id
    pub async fn overdue_list(&self) -> Result<Vec<OverdueLoan>, AppError> {
        let today = self.clock.utc().date_naive();
        let open = self.loans.list_open().await?;
        let titles = self.titles_by_id().await?;
        let borrowers: HashMap<BorrowerId, String> = self
            .borrowers
            .list()
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        let mut overdue: Vec<OverdueLoan> = open
            .into_iter()
            .filter(|loan| loan.is_overdue(today))
            .map(|loan| OverdueLoan {
                loan_id: loan.id,
                title_name: titles
                    .get(&loan.title_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                borrower_name: borrowers.get(&loan.borrower_id).cloned().unwrap_or_default(),
                issue_date: loan.issue_date,
                due_date: loan.due_date,
                days_overdue: loan.days_overdue(today),
            })
            .collect();
        overdue.sort_by(|a, b| {
            b.days_overdue
                .cmp(&a.days_overdue)
                .then(a.loan_id.cmp(&b.loan_id))
        });

        tracing::debug!(count = overdue.len(), %today, "Computed overdue list");
        Ok(overdue)
    }

    /// A borrower's loans, newest issue date first
    pub async fn history(&self, borrower_id: &BorrowerId) -> Result<Vec<HistoryEntry>, AppError> {
        if self.borrowers.find_by_id(borrower_id).await?.is_none() {
            return Err(DomainError::BorrowerNotFound(*borrower_id).into());
        }

        let mut loans = self.loans.list_by_borrower(borrower_id).await?;
        loans.sort_by(|a, b| b.issue_date.cmp(&a.issue_date).then(b.id.cmp(&a.id)));
        let titles = self.titles_by_id().await?;

        Ok(loans
            .into_iter()
            .map(|loan| {
                let title = titles.get(&loan.title_id);
                HistoryEntry {
                    loan_id: loan.id,
                    title_name: title.map(|t| t.name.clone()).unwrap_or_default(),
                    author: title.map(|t| t.author.clone()).unwrap_or_default(),
                    issue_date: loan.issue_date,
                    due_date: loan.due_date,
                    return_date: loan.return_date,
                    status: loan.status,
                    charges: loan.charges(),
                }
            })
            .collect())
    }
}
