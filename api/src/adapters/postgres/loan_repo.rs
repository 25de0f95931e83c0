//! PostgreSQL adapter for LoanRepository
//!
//! `open` and `close` each run inside one database transaction. Dropping an
//! uncommitted `DatabaseTransaction` rolls it back, so every early return
//! leaves both tables untouched.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::title_repo::adjust_available_copies;
use crate::domain::entities::{
    BorrowerId, Loan, LoanId, LoanStatus, Money, NewLoan, ReturnRecord, TitleId,
};
use crate::domain::ports::LoanRepository;
use crate::entity::loans;
use crate::error::DomainError;

/// PostgreSQL implementation of LoanRepository
pub struct PostgresLoanRepository {
    db: DatabaseConnection,
}

impl PostgresLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanRepository for PostgresLoanRepository {
    async fn find_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError> {
        let result = loans::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Loan::try_from).transpose()
    }

    async fn list_open(&self) -> Result<Vec<Loan>, DomainError> {
        let results = loans::Entity::find()
            .filter(loans::Column::Status.eq(LoanStatus::Issued.to_string()))
            .order_by_asc(loans::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Loan::try_from).collect()
    }

    async fn list_by_borrower(&self, borrower_id: &BorrowerId) -> Result<Vec<Loan>, DomainError> {
        let results = loans::Entity::find()
            .filter(loans::Column::BorrowerId.eq(borrower_id.0))
            .order_by_desc(loans::Column::IssueDate)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Loan::try_from).collect()
    }

    async fn open(&self, new_loan: &NewLoan) -> Result<Loan, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        adjust_available_copies(&txn, &new_loan.title_id, -1)
            .await
            .map_err(|e| match e {
                DomainError::AvailabilityOutOfRange { title_id, .. } => {
                    DomainError::NoCopiesAvailable(title_id)
                }
                e => e,
            })?;

        let model = loans::ActiveModel {
            id: Set(LoanId::new().0),
            title_id: Set(new_loan.title_id.0),
            borrower_id: Set(new_loan.borrower_id.0),
            issue_date: Set(new_loan.issue_date),
            due_date: Set(new_loan.due_date),
            return_date: Set(None),
            status: Set(LoanStatus::Issued.to_string()),
            late_fee_cents: Set(None),
            damage_charge_cents: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Loan::try_from(model)
    }

    async fn close(&self, id: &LoanId, record: &ReturnRecord) -> Result<Loan, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // Conditional on the loan still being issued; a concurrent return
        // blocks on the row lock and then matches nothing.
        let result = loans::Entity::update_many()
            .col_expr(
                loans::Column::Status,
                Expr::value(LoanStatus::Returned.to_string()),
            )
            .col_expr(loans::Column::ReturnDate, Expr::value(record.return_date))
            .col_expr(
                loans::Column::LateFeeCents,
                Expr::value(record.late_fee.cents()),
            )
            .col_expr(
                loans::Column::DamageChargeCents,
                Expr::value(record.damage_charge.cents()),
            )
            .filter(loans::Column::Id.eq(id.0))
            .filter(loans::Column::Status.eq(LoanStatus::Issued.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = loans::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or(DomainError::LoanNotFound(*id))?;

        if result.rows_affected == 0 {
            return Err(DomainError::LoanAlreadyReturned(*id));
        }

        adjust_available_copies(&txn, &TitleId(model.title_id), 1).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Loan::try_from(model)
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<loans::Model> for Loan {
    type Error = DomainError;

    fn try_from(model: loans::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse::<LoanStatus>().map_err(|e| {
            DomainError::Internal(format!("Loan {} has a corrupt status: {}", model.id, e))
        })?;

        Ok(Loan {
            id: LoanId(model.id),
            title_id: TitleId(model.title_id),
            borrower_id: BorrowerId(model.borrower_id),
            issue_date: model.issue_date,
            due_date: model.due_date,
            return_date: model.return_date,
            status,
            late_fee: model.late_fee_cents.map(Money::from_cents),
            damage_charge: model.damage_charge_cents.map(Money::from_cents),
        })
    }
}
