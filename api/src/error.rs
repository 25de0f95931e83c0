//! Unified error types for the circulation API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Catalog, registry and ledger precondition failures
//! - `ConfigError`: Startup configuration errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::{BorrowerId, LoanId, TitleId};

/// Coarse classification of a failure, independent of which record it concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Internal,
}

/// Domain layer errors - one variant per failed precondition
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Title {0} not found")]
    TitleNotFound(TitleId),

    #[error("Borrower {0} not found")]
    BorrowerNotFound(BorrowerId),

    #[error("Loan {0} not found")]
    LoanNotFound(LoanId),

    #[error("No copies of title {0} are available")]
    NoCopiesAvailable(TitleId),

    #[error("Loan {0} has already been returned")]
    LoanAlreadyReturned(LoanId),

    #[error("A borrower with email '{0}' is already registered")]
    DuplicateIdentity(String),

    #[error("A title with ISBN '{0}' is already in the catalog")]
    DuplicateIsbn(String),

    #[error("Adjusting availability of title {title_id} by {delta} would leave it outside 0..={total}")]
    AvailabilityOutOfRange {
        title_id: TitleId,
        delta: i32,
        total: i32,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::TitleNotFound(_)
            | DomainError::BorrowerNotFound(_)
            | DomainError::LoanNotFound(_) => ErrorKind::NotFound,
            DomainError::NoCopiesAvailable(_)
            | DomainError::LoanAlreadyReturned(_)
            | DomainError::DuplicateIdentity(_)
            | DomainError::DuplicateIsbn(_)
            | DomainError::AvailabilityOutOfRange { .. } => ErrorKind::Conflict,
            DomainError::Validation(_) => ErrorKind::InvalidInput,
            DomainError::Database(_) | DomainError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Configuration errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Domain(e) => match e.kind() {
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Not found", Some(e.to_string())),
                ErrorKind::Conflict => (StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
                ErrorKind::InvalidInput => (
                    StatusCode::BAD_REQUEST,
                    "Validation error",
                    Some(e.to_string()),
                ),
                ErrorKind::Internal => {
                    tracing::error!("Storage error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error",
                        None,
                    )
                }
            },
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
