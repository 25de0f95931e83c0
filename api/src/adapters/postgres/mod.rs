//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.
//! Schema: `migrations/0001_create_circulation.sql`.

pub mod borrower_repo;
pub mod loan_repo;
pub mod title_repo;

#[cfg(test)]
mod integration_tests;

pub use borrower_repo::PostgresBorrowerRepository;
pub use loan_repo::PostgresLoanRepository;
pub use title_repo::PostgresTitleRepository;
