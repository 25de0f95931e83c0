//! Loan domain entity
//!
//! One borrowing transaction linking a title and a borrower. A loan is created
//! `Issued` and moves exactly once to `Returned`; records are never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::borrower::BorrowerId;
use super::money::Money;
use super::title::TitleId;

/// Unique identifier for a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoanId(pub Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LoanId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Loan lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Issued,
    Returned,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Issued => write!(f, "issued"),
            LoanStatus::Returned => write!(f, "returned"),
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "issued" => Ok(LoanStatus::Issued),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Unknown loan status: {}", s)),
        }
    }
}

/// A loan record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    pub id: LoanId,
    pub title_id: TitleId,
    pub borrower_id: BorrowerId,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Set when the loan is returned
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub late_fee: Option<Money>,
    pub damage_charge: Option<Money>,
}

impl Loan {
    /// Build the record for a freshly issued loan
    pub fn issued(id: LoanId, new_loan: &NewLoan) -> Self {
        Loan {
            id,
            title_id: new_loan.title_id,
            borrower_id: new_loan.borrower_id,
            issue_date: new_loan.issue_date,
            due_date: new_loan.due_date,
            return_date: None,
            status: LoanStatus::Issued,
            late_fee: None,
            damage_charge: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == LoanStatus::Issued
    }

    /// Open and past its due date as of `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date < today
    }

    /// Whole days past due as of `today`; zero when not overdue
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_overdue(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }

    /// Apply the `Issued -> Returned` transition
    pub fn mark_returned(&mut self, record: &ReturnRecord) {
        self.status = LoanStatus::Returned;
        self.return_date = Some(record.return_date);
        self.late_fee = Some(record.late_fee);
        self.damage_charge = Some(record.damage_charge);
    }

    /// Charges settled at return; `None` while the loan is open
    pub fn charges(&self) -> Option<ReturnCharges> {
        match (self.late_fee, self.damage_charge) {
            (Some(late_fee), Some(damage_charge)) => {
                Some(ReturnCharges::new(late_fee, damage_charge))
            }
            _ => None,
        }
    }
}

/// Data needed to open a loan
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub title_id: TitleId,
    pub borrower_id: BorrowerId,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Values written by the return transition
#[derive(Debug, Clone)]
pub struct ReturnRecord {
    pub return_date: NaiveDate,
    pub late_fee: Money,
    pub damage_charge: Money,
}

/// What is owed when a loan comes back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReturnCharges {
    pub late_fee: Money,
    pub damage_charge: Money,
    pub total: Money,
}

impl ReturnCharges {
    pub fn new(late_fee: Money, damage_charge: Money) -> Self {
        Self {
            late_fee,
            damage_charge,
            total: late_fee + damage_charge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_loan(due: NaiveDate) -> Loan {
        Loan::issued(
            LoanId::new(),
            &NewLoan {
                title_id: TitleId::new(),
                borrower_id: BorrowerId::new(),
                issue_date: date(2026, 1, 1),
                due_date: due,
            },
        )
    }

    #[test]
    fn overdue_only_after_due_date() {
        let loan = open_loan(date(2026, 1, 15));
        assert!(!loan.is_overdue(date(2026, 1, 14)));
        assert!(!loan.is_overdue(date(2026, 1, 15)));
        assert!(loan.is_overdue(date(2026, 1, 18)));
        assert_eq!(loan.days_overdue(date(2026, 1, 18)), 3);
        assert_eq!(loan.days_overdue(date(2026, 1, 10)), 0);
    }

    #[test]
    fn returned_loan_is_never_overdue() {
        let mut loan = open_loan(date(2026, 1, 15));
        loan.mark_returned(&ReturnRecord {
            return_date: date(2026, 1, 20),
            late_fee: Money::from_units(25),
            damage_charge: Money::ZERO,
        });
        assert!(!loan.is_open());
        assert!(!loan.is_overdue(date(2026, 2, 1)));
        assert_eq!(loan.return_date, Some(date(2026, 1, 20)));
    }

    #[test]
    fn charges_unset_until_returned() {
        let mut loan = open_loan(date(2026, 1, 15));
        assert!(loan.charges().is_none());

        loan.mark_returned(&ReturnRecord {
            return_date: date(2026, 1, 18),
            late_fee: Money::from_units(15),
            damage_charge: Money::from_cents(200),
        });
        let charges = loan.charges().unwrap();
        assert_eq!(charges.total, Money::from_cents(1700));
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!("issued".parse::<LoanStatus>().unwrap(), LoanStatus::Issued);
        assert_eq!("RETURNED".parse::<LoanStatus>().unwrap(), LoanStatus::Returned);
        assert!("lost".parse::<LoanStatus>().is_err());
        assert_eq!(LoanStatus::Returned.to_string(), "returned");
    }
}
