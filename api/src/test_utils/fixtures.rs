//! Test fixtures
//!
//! Factory functions for creating valid inputs with sensible defaults.
//! Each one can be customized by mutating the returned value.

use chrono::NaiveDate;

use crate::domain::entities::{NewBorrower, NewTitle};

/// A title with `copies` copies and no ISBN
pub fn new_title(name: &str, copies: i32) -> NewTitle {
    NewTitle {
        name: name.to_string(),
        author: "Test Author".to_string(),
        isbn: None,
        category: Some("Fiction".to_string()),
        copies,
    }
}

/// A borrower with only the required fields set
pub fn new_borrower(name: &str, email: &str) -> NewBorrower {
    NewBorrower {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        address: None,
    }
}

/// Fixed reference day used across tests
pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
}
