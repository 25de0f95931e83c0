//! PostgreSQL adapter for BorrowerRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::domain::entities::{Borrower, BorrowerId, ContactUpdate, NewBorrower};
use crate::domain::ports::BorrowerRepository;
use crate::entity::borrowers;
use crate::error::DomainError;

/// PostgreSQL implementation of BorrowerRepository
pub struct PostgresBorrowerRepository {
    db: DatabaseConnection,
}

impl PostgresBorrowerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BorrowerRepository for PostgresBorrowerRepository {
    async fn find_by_id(&self, id: &BorrowerId) -> Result<Option<Borrower>, DomainError> {
        let result = borrowers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Borrower>, DomainError> {
        let result = borrowers::Entity::find()
            .filter(borrowers::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<Borrower>, DomainError> {
        let results = borrowers::Entity::find()
            .order_by_asc(borrowers::Column::Name)
            .order_by_asc(borrowers::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        borrowers::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn create(&self, borrower: &NewBorrower) -> Result<Borrower, DomainError> {
        let model = borrowers::ActiveModel {
            id: Set(BorrowerId::new().0),
            name: Set(borrower.name.clone()),
            email: Set(borrower.email.clone()),
            phone: Set(borrower.phone.clone()),
            address: Set(borrower.address.clone()),
            registered_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::DuplicateIdentity(borrower.email.clone())
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        Ok(result.into())
    }

    async fn update_contact(
        &self,
        id: &BorrowerId,
        update: &ContactUpdate,
    ) -> Result<Borrower, DomainError> {
        let mut model = borrowers::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };
        if let Some(phone) = &update.phone {
            model.phone = Set(Some(phone.clone()));
        }
        if let Some(address) = &update.address {
            model.address = Set(Some(address.clone()));
        }

        let result = model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::BorrowerNotFound(*id),
            e => DomainError::Database(e.to_string()),
        })?;

        Ok(result.into())
    }
}

/// Convert SeaORM model to domain entity
impl From<borrowers::Model> for Borrower {
    fn from(model: borrowers::Model) -> Self {
        Borrower {
            id: BorrowerId(model.id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            registered_at: model.registered_at.with_timezone(&Utc),
        }
    }
}
