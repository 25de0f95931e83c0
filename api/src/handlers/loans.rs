//! Loan handlers
//!
//! All staff-only. Issue and return are the two ledger transitions.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::ReturnOutcome;
use crate::auth::StaffIdentity;
use crate::domain::entities::{ActiveLoan, BorrowerId, Loan, LoanId, Money, TitleId};
use crate::error::AppError;
use crate::AppState;

/// Request to issue a book
#[derive(Debug, Deserialize)]
pub struct IssueLoanRequest {
    pub title_id: Uuid,
    pub borrower_id: Uuid,
    /// Defaults to the configured loan length
    pub loan_days: Option<i64>,
}

/// Request to return a book
#[derive(Debug, Default, Deserialize)]
pub struct ReturnLoanRequest {
    /// Caller-assessed; accepted as given when non-negative
    #[serde(default)]
    pub damage_charge: Money,
}

/// POST /loans
pub async fn issue_loan(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Json(req): Json<IssueLoanRequest>,
) -> Result<(StatusCode, Json<Loan>), AppError> {
    tracing::debug!(staff = %staff.key_fingerprint, "Issue requested");

    let loan = state
        .ledger
        .issue_book(
            &TitleId(req.title_id),
            &BorrowerId(req.borrower_id),
            req.loan_days,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// POST /loans/:id/return
pub async fn return_loan(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ReturnOutcome>, AppError> {
    tracing::debug!(staff = %staff.key_fingerprint, loan_id = %id, "Return requested");

    let req = parse_return_request(&body)?;
    let outcome = state
        .ledger
        .return_book(&LoanId(id), req.damage_charge)
        .await?;

    Ok(Json(outcome))
}

/// An absent body means no damage; anything else must parse
fn parse_return_request(body: &[u8]) -> Result<ReturnLoanRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReturnLoanRequest::default());
    }
    Json::<ReturnLoanRequest>::from_bytes(body)
        .map(|Json(req)| req)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// GET /loans
///
/// Open loans, newest first.
pub async fn list_active_loans(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActiveLoan>>, AppError> {
    Ok(Json(state.ledger.active_loans().await?))
}

/// GET /loans/:id
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Loan>, AppError> {
    Ok(Json(state.ledger.get_loan(&LoanId(id)).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_means_no_damage() {
        assert_eq!(parse_return_request(b"").unwrap().damage_charge, Money::ZERO);
        assert_eq!(parse_return_request(b" \n").unwrap().damage_charge, Money::ZERO);
        assert_eq!(parse_return_request(b"{}").unwrap().damage_charge, Money::ZERO);
    }

    #[test]
    fn malformed_damage_charge_is_a_bad_request() {
        for body in [
            &br#"{"damage_charge":"-1.234"}"#[..],
            br#"{"damage_charge":"two dollars"}"#,
            br#"{"damage_charge":1e300}"#,
            b"damage_charge=2.00",
        ] {
            assert!(matches!(
                parse_return_request(body),
                Err(AppError::BadRequest(_))
            ));
        }
    }
}
