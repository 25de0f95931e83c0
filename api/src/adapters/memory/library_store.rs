//! In-process adapter for all three repository ports
//!
//! Every title row sits behind its own mutex. Issue, return, restock and
//! availability adjustments hold that mutex for their whole read-modify-write,
//! so writers to one title serialize while writers to different titles never
//! contend. Lock order is always: table lock (released) -> title mutex ->
//! loans table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::entities::{
    Borrower, BorrowerId, ContactUpdate, Loan, LoanId, NewBorrower, NewLoan, NewTitle,
    ReturnRecord, Title, TitleId,
};
use crate::domain::ports::{BorrowerRepository, LoanRepository, TitleRepository};
use crate::error::DomainError;

#[derive(Default)]
struct TitleTable {
    rows: HashMap<TitleId, Arc<Mutex<Title>>>,
    by_isbn: HashMap<String, TitleId>,
}

#[derive(Default)]
struct BorrowerTable {
    rows: HashMap<BorrowerId, Borrower>,
    by_email: HashMap<String, BorrowerId>,
}

/// In-memory catalog, registry and ledger store
#[derive(Default)]
pub struct InMemoryLibrary {
    titles: RwLock<TitleTable>,
    borrowers: RwLock<BorrowerTable>,
    loans: RwLock<HashMap<LoanId, Loan>>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the title's row handle without holding the table lock afterwards
    async fn title_row(&self, id: &TitleId) -> Result<Arc<Mutex<Title>>, DomainError> {
        self.titles
            .read()
            .await
            .rows
            .get(id)
            .cloned()
            .ok_or(DomainError::TitleNotFound(*id))
    }
}

fn sort_titles(titles: &mut [Title]) {
    titles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl TitleRepository for InMemoryLibrary {
    async fn find_by_id(&self, id: &TitleId) -> Result<Option<Title>, DomainError> {
        let row = self.titles.read().await.rows.get(id).cloned();
        match row {
            Some(row) => Ok(Some(row.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Title>, DomainError> {
        let row = {
            let table = self.titles.read().await;
            table
                .by_isbn
                .get(isbn)
                .and_then(|id| table.rows.get(id))
                .cloned()
        };
        match row {
            Some(row) => Ok(Some(row.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Title>, DomainError> {
        let rows: Vec<_> = self.titles.read().await.rows.values().cloned().collect();
        let mut titles = Vec::with_capacity(rows.len());
        for row in rows {
            titles.push(row.lock().await.clone());
        }
        sort_titles(&mut titles);
        Ok(titles)
    }

    async fn create(&self, new_title: &NewTitle) -> Result<Title, DomainError> {
        let mut table = self.titles.write().await;

        if let Some(isbn) = &new_title.isbn {
            if table.by_isbn.contains_key(isbn) {
                return Err(DomainError::DuplicateIsbn(isbn.clone()));
            }
        }

        let title = Title {
            id: TitleId::new(),
            name: new_title.name.clone(),
            author: new_title.author.clone(),
            isbn: new_title.isbn.clone(),
            category: new_title.category.clone(),
            total_copies: new_title.copies,
            available_copies: new_title.copies,
            added_at: Utc::now(),
        };

        if let Some(isbn) = &title.isbn {
            table.by_isbn.insert(isbn.clone(), title.id);
        }
        table
            .rows
            .insert(title.id, Arc::new(Mutex::new(title.clone())));

        Ok(title)
    }

    async fn adjust_availability(&self, id: &TitleId, delta: i32) -> Result<Title, DomainError> {
        let row = self.title_row(id).await?;
        let mut title = row.lock().await;

        if !title.can_adjust(delta) {
            return Err(DomainError::AvailabilityOutOfRange {
                title_id: *id,
                delta,
                total: title.total_copies,
            });
        }
        title.available_copies += delta;

        Ok(title.clone())
    }

    async fn restock(&self, id: &TitleId, copies: i32) -> Result<Title, DomainError> {
        let row = self.title_row(id).await?;
        let mut title = row.lock().await;

        let total = title.total_copies.checked_add(copies);
        let available = title.available_copies.checked_add(copies);
        match (total, available) {
            (Some(total), Some(available)) => {
                title.total_copies = total;
                title.available_copies = available;
                Ok(title.clone())
            }
            _ => Err(DomainError::Validation(format!(
                "Restocking {} copies overflows the copy counter",
                copies
            ))),
        }
    }
}

#[async_trait]
impl BorrowerRepository for InMemoryLibrary {
    async fn find_by_id(&self, id: &BorrowerId) -> Result<Option<Borrower>, DomainError> {
        Ok(self.borrowers.read().await.rows.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Borrower>, DomainError> {
        let table = self.borrowers.read().await;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Borrower>, DomainError> {
        let mut borrowers: Vec<Borrower> =
            self.borrowers.read().await.rows.values().cloned().collect();
        borrowers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(borrowers)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.borrowers.read().await.rows.len() as u64)
    }

    async fn create(&self, new_borrower: &NewBorrower) -> Result<Borrower, DomainError> {
        let mut table = self.borrowers.write().await;

        if table.by_email.contains_key(&new_borrower.email) {
            return Err(DomainError::DuplicateIdentity(new_borrower.email.clone()));
        }

        let borrower = Borrower {
            id: BorrowerId::new(),
            name: new_borrower.name.clone(),
            email: new_borrower.email.clone(),
            phone: new_borrower.phone.clone(),
            address: new_borrower.address.clone(),
            registered_at: Utc::now(),
        };

        table.by_email.insert(borrower.email.clone(), borrower.id);
        table.rows.insert(borrower.id, borrower.clone());

        Ok(borrower)
    }

    async fn update_contact(
        &self,
        id: &BorrowerId,
        update: &ContactUpdate,
    ) -> Result<Borrower, DomainError> {
        let mut table = self.borrowers.write().await;
        let borrower = table
            .rows
            .get_mut(id)
            .ok_or(DomainError::BorrowerNotFound(*id))?;

        if let Some(phone) = &update.phone {
            borrower.phone = Some(phone.clone());
        }
        if let Some(address) = &update.address {
            borrower.address = Some(address.clone());
        }

        Ok(borrower.clone())
    }
}

#[async_trait]
impl LoanRepository for InMemoryLibrary {
    async fn find_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError> {
        Ok(self.loans.read().await.get(id).cloned())
    }

    async fn list_open(&self) -> Result<Vec<Loan>, DomainError> {
        Ok(self
            .loans
            .read()
            .await
            .values()
            .filter(|loan| loan.is_open())
            .cloned()
            .collect())
    }

    async fn list_by_borrower(&self, borrower_id: &BorrowerId) -> Result<Vec<Loan>, DomainError> {
        Ok(self
            .loans
            .read()
            .await
            .values()
            .filter(|loan| loan.borrower_id == *borrower_id)
            .cloned()
            .collect())
    }

    async fn open(&self, new_loan: &NewLoan) -> Result<Loan, DomainError> {
        let row = self.title_row(&new_loan.title_id).await?;
        let mut title = row.lock().await;

        if !title.is_available() {
            return Err(DomainError::NoCopiesAvailable(new_loan.title_id));
        }

        let loan = Loan::issued(LoanId::new(), new_loan);
        self.loans.write().await.insert(loan.id, loan.clone());
        title.available_copies -= 1;

        Ok(loan)
    }

    async fn close(&self, id: &LoanId, record: &ReturnRecord) -> Result<Loan, DomainError> {
        let title_id = self
            .loans
            .read()
            .await
            .get(id)
            .map(|loan| loan.title_id)
            .ok_or(DomainError::LoanNotFound(*id))?;

        let row = self.title_row(&title_id).await?;
        let mut title = row.lock().await;
        let mut loans = self.loans.write().await;
        let loan = loans.get_mut(id).ok_or(DomainError::LoanNotFound(*id))?;

        if !loan.is_open() {
            return Err(DomainError::LoanAlreadyReturned(*id));
        }
        if !title.can_adjust(1) {
            return Err(DomainError::AvailabilityOutOfRange {
                title_id,
                delta: 1,
                total: title.total_copies,
            });
        }

        loan.mark_returned(record);
        title.available_copies += 1;

        Ok(loan.clone())
    }
}
