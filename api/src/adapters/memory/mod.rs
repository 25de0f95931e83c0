//! In-memory adapters
//!
//! Used when no database is configured, and as the store behind service tests.

pub mod library_store;

pub use library_store::InMemoryLibrary;
