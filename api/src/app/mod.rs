//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports and the clock.

pub mod borrower_service;
pub mod catalog_service;
pub mod charges;
pub mod ledger_service;
pub mod report_service;

pub use borrower_service::BorrowerService;
pub use catalog_service::CatalogService;
pub use charges::LoanPolicy;
pub use ledger_service::{LedgerService, ReturnOutcome};
pub use report_service::ReportService;
