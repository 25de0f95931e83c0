//! PostgreSQL adapter for TitleRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::domain::entities::{NewTitle, Title, TitleId};
use crate::domain::ports::TitleRepository;
use crate::entity::titles;
use crate::error::DomainError;

/// PostgreSQL implementation of TitleRepository
pub struct PostgresTitleRepository {
    db: DatabaseConnection,
}

impl PostgresTitleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Shift `available_copies` with a single conditional UPDATE.
///
/// The row lock taken by the UPDATE serializes concurrent callers on the same
/// title; the WHERE clause re-checks the range after any competing commit.
/// Runs on a plain connection or inside a caller's transaction.
pub(super) async fn adjust_available_copies<C>(
    conn: &C,
    id: &TitleId,
    delta: i32,
) -> Result<Title, DomainError>
where
    C: ConnectionTrait,
{
    let result = titles::Entity::update_many()
        .col_expr(
            titles::Column::AvailableCopies,
            Expr::col(titles::Column::AvailableCopies).add(delta),
        )
        .filter(titles::Column::Id.eq(id.0))
        .filter(Expr::expr(Expr::col(titles::Column::AvailableCopies).add(delta)).gte(0))
        .filter(
            Expr::expr(Expr::col(titles::Column::AvailableCopies).add(delta))
                .lte(Expr::col(titles::Column::TotalCopies)),
        )
        .exec(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let current = titles::Entity::find_by_id(id.0)
        .one(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .ok_or(DomainError::TitleNotFound(*id))?;

    if result.rows_affected == 0 {
        return Err(DomainError::AvailabilityOutOfRange {
            title_id: *id,
            delta,
            total: current.total_copies,
        });
    }

    Ok(current.into())
}

#[async_trait]
impl TitleRepository for PostgresTitleRepository {
    async fn find_by_id(&self, id: &TitleId) -> Result<Option<Title>, DomainError> {
        let result = titles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Title>, DomainError> {
        let result = titles::Entity::find()
            .filter(titles::Column::Isbn.eq(isbn))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<Title>, DomainError> {
        let results = titles::Entity::find()
            .order_by_asc(titles::Column::Name)
            .order_by_asc(titles::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, title: &NewTitle) -> Result<Title, DomainError> {
        let model = titles::ActiveModel {
            id: Set(TitleId::new().0),
            name: Set(title.name.clone()),
            author: Set(title.author.clone()),
            isbn: Set(title.isbn.clone()),
            category: Set(title.category.clone()),
            total_copies: Set(title.copies),
            available_copies: Set(title.copies),
            added_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::DuplicateIsbn(title.isbn.clone().unwrap_or_default())
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        Ok(result.into())
    }

    async fn adjust_availability(&self, id: &TitleId, delta: i32) -> Result<Title, DomainError> {
        adjust_available_copies(&self.db, id, delta).await
    }

    async fn restock(&self, id: &TitleId, copies: i32) -> Result<Title, DomainError> {
        let result = titles::Entity::update_many()
            .col_expr(
                titles::Column::TotalCopies,
                Expr::col(titles::Column::TotalCopies).add(copies),
            )
            .col_expr(
                titles::Column::AvailableCopies,
                Expr::col(titles::Column::AvailableCopies).add(copies),
            )
            .filter(titles::Column::Id.eq(id.0))
            .filter(titles::Column::TotalCopies.lte(i32::MAX.saturating_sub(copies)))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(DomainError::Validation(format!(
                    "Restocking {} copies overflows the copy counter",
                    copies
                ))),
                None => Err(DomainError::TitleNotFound(*id)),
            };
        }

        self.find_by_id(id)
            .await?
            .ok_or(DomainError::TitleNotFound(*id))
    }
}

/// Convert SeaORM model to domain entity
impl From<titles::Model> for Title {
    fn from(model: titles::Model) -> Self {
        Title {
            id: TitleId(model.id),
            name: model.name,
            author: model.author,
            isbn: model.isbn,
            category: model.category,
            total_copies: model.total_copies,
            available_copies: model.available_copies,
            added_at: model.added_at.with_timezone(&Utc),
        }
    }
}
