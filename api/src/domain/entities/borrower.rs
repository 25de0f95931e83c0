//! Borrower domain entity
//!
//! Identity records eligible to hold loans. The email address is the unique
//! identity key; borrowers are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a borrower
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BorrowerId(pub Uuid);

impl BorrowerId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BorrowerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BorrowerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BorrowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Borrower {
    pub id: BorrowerId,
    pub name: String,
    /// Normalized (trimmed, lowercase) identity key
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Data needed to register a borrower
#[derive(Debug, Clone, Deserialize)]
pub struct NewBorrower {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Contact fields that may change after registration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.address.is_none()
    }
}

/// Canonical form of an identity key, used for uniqueness checks and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Jane.Smith@Email.com "), "jane.smith@email.com");
    }

    #[test]
    fn empty_contact_update() {
        assert!(ContactUpdate::default().is_empty());
        let update = ContactUpdate {
            phone: Some("555".to_string()),
            address: None,
        };
        assert!(!update.is_empty());
    }
}
