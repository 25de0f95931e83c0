//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod borrower;
pub mod loan;
pub mod money;
pub mod report;
pub mod title;

pub use borrower::{normalize_email, Borrower, BorrowerId, ContactUpdate, NewBorrower};
pub use loan::{Loan, LoanId, LoanStatus, NewLoan, ReturnCharges, ReturnRecord};
pub use money::Money;
pub use report::{ActiveLoan, HistoryEntry, LibraryStatistics, OverdueLoan};
pub use title::{NewTitle, Title, TitleId};
