//! Title domain entity
//!
//! A catalog entry for a book. Physical copies are tracked only as counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TitleId(pub Uuid);

impl TitleId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TitleId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TitleId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TitleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog title with its copy counters
///
/// `available_copies` stays within `0..=total_copies`; only the ledger's
/// issue/return transitions and restocking change it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub added_at: DateTime<Utc>,
}

impl Title {
    /// Check if at least one copy can be lent
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Whether shifting availability by `delta` keeps the counter in range
    pub fn can_adjust(&self, delta: i32) -> bool {
        self.available_copies
            .checked_add(delta)
            .is_some_and(|next| (0..=self.total_copies).contains(&next))
    }
}

/// Data needed to add a title to the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct NewTitle {
    pub name: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub copies: i32,
}
