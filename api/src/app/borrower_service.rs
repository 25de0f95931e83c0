//! Borrower service
//!
//! Registration and lookup of borrowers. The email address is the identity
//! key. Lookup by email carries no secret: anyone who knows a borrower's
//! address can resolve their record. That weak model is kept as-is.

use std::sync::Arc;

use super::catalog_service::{check_length, non_blank, MAX_NAME_CHARS};
use crate::domain::entities::{normalize_email, Borrower, BorrowerId, ContactUpdate, NewBorrower};
use crate::domain::ports::BorrowerRepository;
use crate::error::{AppError, DomainError};

const MAX_EMAIL_CHARS: usize = 255;
const MAX_PHONE_CHARS: usize = 20;

/// Service for managing borrowers
pub struct BorrowerService<BR>
where
    BR: BorrowerRepository + ?Sized,
{
    borrowers: Arc<BR>,
}

impl<BR> BorrowerService<BR>
where
    BR: BorrowerRepository + ?Sized,
{
    pub fn new(borrowers: Arc<BR>) -> Self {
        Self { borrowers }
    }

    /// Register a new borrower
    pub async fn register(&self, borrower: NewBorrower) -> Result<Borrower, AppError> {
        let name = borrower.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()).into());
        }
        check_length("Name", &name, MAX_NAME_CHARS)?;

        let email = normalize_email(&borrower.email);
        if !is_plausible_email(&email) {
            return Err(DomainError::Validation(format!(
                "'{}' is not a valid email address",
                borrower.email.trim()
            ))
            .into());
        }
        check_length("Email", &email, MAX_EMAIL_CHARS)?;

        let phone = non_blank(borrower.phone);
        check_phone(phone.as_deref())?;

        let created = self
            .borrowers
            .create(&NewBorrower {
                name,
                email,
                phone,
                address: non_blank(borrower.address),
            })
            .await?;

        tracing::info!(borrower_id = %created.id, "Borrower registered");
        Ok(created)
    }

    /// Look up a borrower, failing with `BorrowerNotFound`
    pub async fn get_borrower(&self, id: &BorrowerId) -> Result<Borrower, AppError> {
        Ok(self
            .borrowers
            .find_by_id(id)
            .await?
            .ok_or(DomainError::BorrowerNotFound(*id))?)
    }

    /// Resolve a borrower by identity key
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Borrower>, AppError> {
        Ok(self
            .borrowers
            .find_by_email(&normalize_email(email))
            .await?)
    }

    /// All borrowers ordered by name
    pub async fn list_borrowers(&self) -> Result<Vec<Borrower>, AppError> {
        Ok(self.borrowers.list().await?)
    }

    /// Change phone and/or address; identity fields are immutable
    pub async fn update_contact(
        &self,
        id: &BorrowerId,
        update: ContactUpdate,
    ) -> Result<Borrower, AppError> {
        let update = ContactUpdate {
            phone: non_blank(update.phone),
            address: non_blank(update.address),
        };
        if update.is_empty() {
            return Err(DomainError::Validation(
                "Provide a phone number or address to update".to_string(),
            )
            .into());
        }
        check_phone(update.phone.as_deref())?;

        let updated = self.borrowers.update_contact(id, &update).await?;
        tracing::info!(borrower_id = %id, "Borrower contact updated");
        Ok(updated)
    }
}

fn check_phone(phone: Option<&str>) -> Result<(), DomainError> {
    match phone {
        Some(phone) => check_length("Phone", phone, MAX_PHONE_CHARS),
        None => Ok(()),
    }
}

/// Cheap shape check: something before and after a single `@`, and a dot in the domain
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLibrary;
    use crate::test_utils::new_borrower;

    fn create_service() -> BorrowerService<InMemoryLibrary> {
        BorrowerService::new(Arc::new(InMemoryLibrary::new()))
    }

    #[test]
    fn email_shape_check() {
        assert!(is_plausible_email("john.doe@email.com"));
        assert!(!is_plausible_email("john.doe"));
        assert!(!is_plausible_email("@email.com"));
        assert!(!is_plausible_email("a@b@c.com"));
        assert!(!is_plausible_email("john@localhost"));
        assert!(!is_plausible_email("jo hn@email.com"));
    }

    #[tokio::test]
    async fn register_normalizes_email() {
        let service = create_service();
        let borrower = service
            .register(new_borrower("John Doe", "  John.Doe@Email.com "))
            .await
            .unwrap();

        assert_eq!(borrower.email, "john.doe@email.com");
        let found = service.find_by_email("JOHN.DOE@email.com").await.unwrap();
        assert_eq!(found.map(|b| b.id), Some(borrower.id));
    }

    #[tokio::test]
    async fn duplicate_identity_is_a_distinct_error() {
        let service = create_service();
        service
            .register(new_borrower("John Doe", "john.doe@email.com"))
            .await
            .unwrap();

        let result = service
            .register(new_borrower("Johnny Doe", "JOHN.DOE@email.com"))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::DuplicateIdentity(_)))
        ));
    }

    #[tokio::test]
    async fn register_rejects_invalid_input() {
        let service = create_service();

        let result = service.register(new_borrower("", "a@b.com")).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));

        let result = service.register(new_borrower("Ann", "not-an-email")).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn update_contact_requires_a_field() {
        let service = create_service();
        let borrower = service
            .register(new_borrower("Jane Smith", "jane@example.com"))
            .await
            .unwrap();

        let result = service
            .update_contact(
                &borrower.id,
                ContactUpdate {
                    phone: Some("  ".to_string()),
                    address: None,
                },
            )
            .await;
        assert!(result.is_err());

        let updated = service
            .update_contact(
                &borrower.id,
                ContactUpdate {
                    phone: None,
                    address: Some("456 Oak Ave".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.address.as_deref(), Some("456 Oak Ave"));
    }

    #[tokio::test]
    async fn register_rejects_over_long_fields() {
        let service = create_service();

        let long_name = new_borrower(&"n".repeat(256), "ann@example.com");
        let long_email = new_borrower("Ann", &format!("{}@example.com", "a".repeat(250)));
        let mut long_phone = new_borrower("Ann", "ann@example.com");
        long_phone.phone = Some("5".repeat(25));

        for input in [long_name, long_email, long_phone] {
            let result = service.register(input).await;
            assert!(matches!(
                result,
                Err(AppError::Domain(DomainError::Validation(_)))
            ));
        }
        assert!(service.list_borrowers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn name_limit_counts_characters() {
        let service = create_service();
        let borrower = service
            .register(new_borrower(&"ß".repeat(255), "ann@example.com"))
            .await
            .unwrap();

        assert_eq!(borrower.name.chars().count(), 255);
    }

    #[tokio::test]
    async fn update_contact_rejects_over_long_phone() {
        let service = create_service();
        let borrower = service
            .register(new_borrower("Jane Smith", "jane@example.com"))
            .await
            .unwrap();

        let result = service
            .update_contact(
                &borrower.id,
                ContactUpdate {
                    phone: Some("+1 555 0100 ext 12345".to_string()),
                    address: None,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
        assert!(service
            .get_borrower(&borrower.id)
            .await
            .unwrap()
            .phone
            .is_none());
    }

    #[tokio::test]
    async fn update_contact_of_unknown_borrower() {
        let service = create_service();
        let result = service
            .update_contact(
                &BorrowerId::new(),
                ContactUpdate {
                    phone: Some("555".to_string()),
                    address: None,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::BorrowerNotFound(_)))
        ));
    }
}
