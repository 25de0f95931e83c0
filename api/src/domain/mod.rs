//! Domain layer
//!
//! Titles, borrowers and loans, with no storage or transport concerns.
//! - `entities`: Catalog, registry and ledger records plus report views
//! - `ports`: Storage traits the ledger and its collaborators call through

pub mod entities;
pub mod ports;
