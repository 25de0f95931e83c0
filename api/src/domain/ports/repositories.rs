//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (in-memory and PostgreSQL).
//!
//! The only cross-record atomic operations are `LoanRepository::open` and
//! `LoanRepository::close`: each changes a loan record and the owning title's
//! availability counter as one unit, or changes nothing.

use async_trait::async_trait;

use crate::domain::entities::{
    Borrower, BorrowerId, ContactUpdate, Loan, LoanId, NewBorrower, NewLoan, NewTitle,
    ReturnRecord, Title, TitleId,
};
use crate::error::DomainError;

/// Catalog storage
#[async_trait]
pub trait TitleRepository: Send + Sync {
    /// Find a title by ID
    async fn find_by_id(&self, id: &TitleId) -> Result<Option<Title>, DomainError>;

    /// Find a title by ISBN
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Title>, DomainError>;

    /// All titles, ordered by name
    async fn list(&self) -> Result<Vec<Title>, DomainError>;

    /// Create a title with every copy available.
    /// Fails with `DuplicateIsbn` when the ISBN is already catalogued.
    async fn create(&self, title: &NewTitle) -> Result<Title, DomainError>;

    /// Shift `available_copies` by `delta`, atomically per title.
    /// Fails with `AvailabilityOutOfRange` if the result would leave `0..=total`.
    async fn adjust_availability(&self, id: &TitleId, delta: i32) -> Result<Title, DomainError>;

    /// Add copies to both the total and the available counters
    async fn restock(&self, id: &TitleId, copies: i32) -> Result<Title, DomainError>;
}

/// Borrower registry storage
#[async_trait]
pub trait BorrowerRepository: Send + Sync {
    /// Find a borrower by ID
    async fn find_by_id(&self, id: &BorrowerId) -> Result<Option<Borrower>, DomainError>;

    /// Find a borrower by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<Borrower>, DomainError>;

    /// All borrowers, ordered by name
    async fn list(&self) -> Result<Vec<Borrower>, DomainError>;

    /// Number of registered borrowers
    async fn count(&self) -> Result<u64, DomainError>;

    /// Register a borrower. The email must already be normalized.
    /// Fails with `DuplicateIdentity` when the email is taken.
    async fn create(&self, borrower: &NewBorrower) -> Result<Borrower, DomainError>;

    /// Replace the provided contact fields
    async fn update_contact(
        &self,
        id: &BorrowerId,
        update: &ContactUpdate,
    ) -> Result<Borrower, DomainError>;
}

/// Loan ledger storage
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find a loan by ID
    async fn find_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError>;

    /// All loans still in the `Issued` state
    async fn list_open(&self) -> Result<Vec<Loan>, DomainError>;

    /// Every loan a borrower has ever held
    async fn list_by_borrower(&self, borrower_id: &BorrowerId) -> Result<Vec<Loan>, DomainError>;

    /// Take one available copy of the title and record an issued loan.
    ///
    /// The availability check, the decrement and the insert are one atomic
    /// unit. Fails with `TitleNotFound` or `NoCopiesAvailable`, leaving all
    /// state unchanged.
    async fn open(&self, loan: &NewLoan) -> Result<Loan, DomainError>;

    /// Move an issued loan to returned and give its copy back.
    ///
    /// The `Issued` check and both writes are one atomic unit. Fails with
    /// `LoanNotFound` or `LoanAlreadyReturned`, leaving all state unchanged.
    async fn close(&self, id: &LoanId, record: &ReturnRecord) -> Result<Loan, DomainError>;
}
