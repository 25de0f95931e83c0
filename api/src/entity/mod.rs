//! SeaORM entity models for the circulation schema
//!
//! Mirrors `migrations/0001_create_circulation.sql`.

pub mod borrowers;
pub mod loans;
pub mod titles;
