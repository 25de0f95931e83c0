//! Adapters layer
//!
//! Implementations of port traits for storage backends.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryLibrary;
pub use postgres::{PostgresBorrowerRepository, PostgresLoanRepository, PostgresTitleRepository};
