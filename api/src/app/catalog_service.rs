//! Catalog service
//!
//! Adds titles, restocks copies and answers title lookups. The availability
//! counter is never written here except through restocking, which raises
//! the total by the same amount.

use std::sync::Arc;

use crate::domain::entities::{NewTitle, Title, TitleId};
use crate::domain::ports::TitleRepository;
use crate::error::{AppError, DomainError};

/// Column widths of the persistent schema, in characters
pub(crate) const MAX_NAME_CHARS: usize = 255;
const MAX_ISBN_CHARS: usize = 50;
const MAX_CATEGORY_CHARS: usize = 100;

/// Service for managing the catalog
pub struct CatalogService<TR>
where
    TR: TitleRepository + ?Sized,
{
    titles: Arc<TR>,
}

impl<TR> CatalogService<TR>
where
    TR: TitleRepository + ?Sized,
{
    pub fn new(titles: Arc<TR>) -> Self {
        Self { titles }
    }

    /// Add a title with every copy on the shelf
    pub async fn add_title(&self, title: NewTitle) -> Result<Title, AppError> {
        let title = normalize_title(title)?;
        let created = self.titles.create(&title).await?;

        tracing::info!(
            title_id = %created.id,
            copies = created.total_copies,
            "Title added to catalog"
        );
        Ok(created)
    }

    /// Look up a title, failing with `TitleNotFound`
    pub async fn get_title(&self, id: &TitleId) -> Result<Title, AppError> {
        Ok(self
            .titles
            .find_by_id(id)
            .await?
            .ok_or(DomainError::TitleNotFound(*id))?)
    }

    /// Look up a title by ISBN
    pub async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Title>, AppError> {
        tracing::debug!(isbn, "Looking up title by ISBN");
        Ok(self.titles.find_by_isbn(isbn.trim()).await?)
    }

    /// All titles ordered by name
    pub async fn list_titles(&self) -> Result<Vec<Title>, AppError> {
        Ok(self.titles.list().await?)
    }

    /// Add copies of an existing title
    pub async fn restock(&self, id: &TitleId, copies: i32) -> Result<Title, AppError> {
        if copies <= 0 {
            return Err(DomainError::Validation(format!(
                "Restock must add at least one copy, got {}",
                copies
            ))
            .into());
        }

        let current = self.get_title(id).await?;
        if current.total_copies.checked_add(copies).is_none() {
            return Err(DomainError::Validation(format!(
                "Restocking {} copies would exceed the copy limit of {}",
                copies,
                i32::MAX
            ))
            .into());
        }

        let title = self.titles.restock(id, copies).await?;
        tracing::info!(
            title_id = %id,
            added = copies,
            total = title.total_copies,
            available = title.available_copies,
            "Title restocked"
        );
        Ok(title)
    }
}

/// Trim text fields, drop blank optionals and check required values
fn normalize_title(title: NewTitle) -> Result<NewTitle, DomainError> {
    let name = title.name.trim().to_string();
    let author = title.author.trim().to_string();

    if name.is_empty() {
        return Err(DomainError::Validation("Title name is required".to_string()));
    }
    if author.is_empty() {
        return Err(DomainError::Validation("Author is required".to_string()));
    }
    check_length("Title name", &name, MAX_NAME_CHARS)?;
    check_length("Author", &author, MAX_NAME_CHARS)?;
    if title.copies < 1 {
        return Err(DomainError::Validation(format!(
            "A title needs at least one copy, got {}",
            title.copies
        )));
    }

    let isbn = non_blank(title.isbn);
    let category = non_blank(title.category);
    if let Some(isbn) = &isbn {
        check_length("ISBN", isbn, MAX_ISBN_CHARS)?;
    }
    if let Some(category) = &category {
        check_length("Category", category, MAX_CATEGORY_CHARS)?;
    }

    Ok(NewTitle {
        name,
        author,
        isbn,
        category,
        copies: title.copies,
    })
}

/// Fail with `Validation` when `value` is longer than `max` characters
pub(crate) fn check_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let chars = value.chars().count();
    if chars > max {
        return Err(DomainError::Validation(format!(
            "{} must be at most {} characters, got {}",
            field, max, chars
        )));
    }
    Ok(())
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
