//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.
//! Time comes from `mockable::Clock`, injected as `Arc<dyn Clock>`.

pub mod repositories;

pub use mockable::Clock;
pub use repositories::{BorrowerRepository, LoanRepository, TitleRepository};
