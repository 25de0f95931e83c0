//! Report handlers

use axum::{extract::State, Json};

use crate::domain::entities::{LibraryStatistics, OverdueLoan};
use crate::error::AppError;
use crate::AppState;

/// GET /reports/statistics
pub async fn statistics_report(
    State(state): State<AppState>,
) -> Result<Json<LibraryStatistics>, AppError> {
    Ok(Json(state.reports.statistics().await?))
}

/// GET /reports/overdue
///
/// Most overdue first.
pub async fn overdue_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<OverdueLoan>>, AppError> {
    Ok(Json(state.reports.overdue_list().await?))
}
