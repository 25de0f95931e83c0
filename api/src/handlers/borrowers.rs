//! Borrower handlers
//!
//! Registration and email lookup are public. Lookup by email needs no
//! secret, so anyone knowing an address can read that borrower's record.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::{Borrower, BorrowerId, ContactUpdate, HistoryEntry, NewBorrower};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for email lookup
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: String,
}

/// POST /borrowers
pub async fn register_borrower(
    State(state): State<AppState>,
    Json(req): Json<NewBorrower>,
) -> Result<(StatusCode, Json<Borrower>), AppError> {
    let borrower = state.borrowers.register(req).await?;
    Ok((StatusCode::CREATED, Json(borrower)))
}

/// GET /borrowers/lookup?email=
pub async fn lookup_borrower(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Borrower>, AppError> {
    if query.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".to_string()));
    }

    let borrower = state
        .borrowers
        .find_by_email(&query.email)
        .await?
        .ok_or_else(|| AppError::NotFound("No borrower with that email".to_string()))?;

    Ok(Json(borrower))
}

/// GET /borrowers
pub async fn list_borrowers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Borrower>>, AppError> {
    Ok(Json(state.borrowers.list_borrowers().await?))
}

/// GET /borrowers/:id
pub async fn get_borrower(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Borrower>, AppError> {
    Ok(Json(state.borrowers.get_borrower(&BorrowerId(id)).await?))
}

/// PATCH /borrowers/:id
///
/// Only phone and address can change.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ContactUpdate>,
) -> Result<Json<Borrower>, AppError> {
    Ok(Json(
        state
            .borrowers
            .update_contact(&BorrowerId(id), req)
            .await?,
    ))
}

/// GET /borrowers/:id/history
pub async fn borrower_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.reports.history(&BorrowerId(id)).await?))
}
