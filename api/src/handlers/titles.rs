//! Title handlers
//!
//! Catalog browsing is public; adding and restocking titles is staff-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::{NewTitle, Title, TitleId};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing titles
#[derive(Debug, Deserialize)]
pub struct ListTitlesQuery {
    /// Restrict the listing to the title with this ISBN
    pub isbn: Option<String>,
}

/// Request to add copies of a title
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub copies: i32,
}

/// GET /titles
///
/// List the catalog ordered by name, or the single title matching `?isbn=`.
pub async fn list_titles(
    State(state): State<AppState>,
    Query(query): Query<ListTitlesQuery>,
) -> Result<Json<Vec<Title>>, AppError> {
    let titles = match query.isbn.as_deref() {
        Some(isbn) => state.catalog.find_by_isbn(isbn).await?.into_iter().collect(),
        None => state.catalog.list_titles().await?,
    };
    Ok(Json(titles))
}

/// GET /titles/:id
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Title>, AppError> {
    Ok(Json(state.catalog.get_title(&TitleId(id)).await?))
}

/// POST /titles
///
/// Add a title with all of its copies available.
pub async fn create_title(
    State(state): State<AppState>,
    Json(req): Json<NewTitle>,
) -> Result<(StatusCode, Json<Title>), AppError> {
    let title = state.catalog.add_title(req).await?;
    Ok((StatusCode::CREATED, Json(title)))
}

/// POST /titles/:id/restock
pub async fn restock_title(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<Title>, AppError> {
    Ok(Json(state.catalog.restock(&TitleId(id), req.copies).await?))
}
