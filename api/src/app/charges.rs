//! Loan policy and return-time charge computation
//!
//! Pure functions over calendar dates. Nothing here reads the clock.

use chrono::{Days, NaiveDate};

use crate::domain::entities::Money;
use crate::error::DomainError;

/// Late fee charged per day past the due date
pub const DEFAULT_LATE_FEE_PER_DAY: Money = Money::from_units(5);

/// Loan length used when the caller does not pass one
pub const DEFAULT_LOAN_DAYS: u32 = 14;

/// Tunable lending rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    /// Flat daily late fee
    pub late_fee_per_day: Money,
    /// Loan length when none is requested
    pub default_loan_days: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            late_fee_per_day: DEFAULT_LATE_FEE_PER_DAY,
            default_loan_days: DEFAULT_LOAN_DAYS,
        }
    }
}

/// Due date for a loan of `loan_days` starting on `issue_date`.
/// `loan_days` must be positive.
pub fn due_date(issue_date: NaiveDate, loan_days: i64) -> Result<NaiveDate, DomainError> {
    if loan_days <= 0 {
        return Err(DomainError::Validation(format!(
            "Loan duration must be a positive number of days, got {}",
            loan_days
        )));
    }

    u64::try_from(loan_days)
        .ok()
        .and_then(|days| issue_date.checked_add_days(Days::new(days)))
        .ok_or_else(|| {
            DomainError::Validation(format!("Loan duration of {} days is too long", loan_days))
        })
}

/// Whole days between the due date and the return date; zero if on time
pub fn days_late(due_date: NaiveDate, returned_on: NaiveDate) -> i64 {
    (returned_on - due_date).num_days().max(0)
}

/// `max(0, days late) * rate`
pub fn late_fee(due_date: NaiveDate, returned_on: NaiveDate, rate_per_day: Money) -> Money {
    rate_per_day.times(days_late(due_date, returned_on))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_rate_is_five_per_day() {
        assert_eq!(LoanPolicy::default().late_fee_per_day, Money::from_units(5));
        assert_eq!(LoanPolicy::default().default_loan_days, 14);
    }

    #[test]
    fn due_date_adds_calendar_days() {
        assert_eq!(due_date(date(2026, 1, 25), 14).unwrap(), date(2026, 2, 8));
    }

    #[test]
    fn non_positive_duration_is_invalid() {
        assert!(matches!(
            due_date(date(2026, 1, 1), 0),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            due_date(date(2026, 1, 1), -3),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn on_time_return_has_no_fee() {
        let due = date(2026, 3, 15);
        assert_eq!(late_fee(due, due, DEFAULT_LATE_FEE_PER_DAY), Money::ZERO);
        assert_eq!(
            late_fee(due, date(2026, 3, 10), DEFAULT_LATE_FEE_PER_DAY),
            Money::ZERO
        );
    }

    #[test]
    fn fee_is_days_late_times_rate() {
        let due = date(2026, 3, 15);
        assert_eq!(days_late(due, date(2026, 3, 18)), 3);
        assert_eq!(
            late_fee(due, date(2026, 3, 18), DEFAULT_LATE_FEE_PER_DAY),
            Money::from_units(15)
        );
        assert_eq!(
            late_fee(due, date(2026, 4, 14), Money::from_cents(25)),
            Money::from_cents(30 * 25)
        );
    }
}
