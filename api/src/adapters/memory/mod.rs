//! In-memory adapter
//!
//! Catalog store and loan ledger kept behind a single lock, so the borrow and
//! return commits change both or neither. Used when no database is configured.

pub mod catalog;
pub mod ledger;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{Book, BookId, Loan, Member, MemberId, NewBook, NewMember};
use crate::domain::ports::{CatalogRepository, LibraryRepository, LoanRepository};
use crate::error::DomainError;

pub use catalog::CatalogStore;
pub use ledger::LoanLedger;

#[derive(Debug, Default)]
struct LibraryState {
    catalog: CatalogStore,
    ledger: LoanLedger,
}

/// In-memory implementation of LibraryRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryLibraryRepository {
    state: Arc<RwLock<LibraryState>>,
}

impl InMemoryLibraryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LibraryState>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::Internal("library state lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LibraryState>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::Internal("library state lock poisoned".to_string()))
    }
}

#[cfg(test)]
impl InMemoryLibraryRepository {
    /// Pre-populate with a book
    pub fn with_book(self, book: NewBook) -> Self {
        self.state.write().unwrap().catalog.add_book(book);
        self
    }

    /// Pre-populate with a member
    pub fn with_member(self, member: NewMember) -> Self {
        self.state.write().unwrap().catalog.register_member(member);
        self
    }
}

#[async_trait]
impl CatalogRepository for InMemoryLibraryRepository {
    async fn add_book(&self, book: &NewBook) -> Result<Book, DomainError> {
        Ok(self.write()?.catalog.add_book(book.clone()))
    }

    async fn register_member(&self, member: &NewMember) -> Result<Member, DomainError> {
        Ok(self.write()?.catalog.register_member(member.clone()))
    }

    async fn find_book(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        Ok(self.read()?.catalog.find_book(id).cloned())
    }

    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self.read()?.catalog.find_member(id).cloned())
    }

    async fn member_exists(&self, id: &MemberId) -> Result<bool, DomainError> {
        Ok(self.read()?.catalog.member_exists(id))
    }

    async fn list_all_books(&self) -> Result<Vec<Book>, DomainError> {
        Ok(self.read()?.catalog.list_all_books())
    }

    async fn list_available_books(&self) -> Result<Vec<Book>, DomainError> {
        Ok(self.read()?.catalog.list_available_books())
    }
}

#[async_trait]
impl LoanRepository for InMemoryLibraryRepository {
    async fn find_active_loan(&self, book_id: &BookId) -> Result<Option<Loan>, DomainError> {
        Ok(self.read()?.ledger.find_active_loan(book_id).cloned())
    }

    async fn list_active_loans(&self) -> Result<Vec<Loan>, DomainError> {
        Ok(self.read()?.ledger.list_active_loans())
    }
}

#[async_trait]
impl LibraryRepository for InMemoryLibraryRepository {
    async fn commit_borrow(&self, loan: &Loan) -> Result<(), DomainError> {
        let mut state = self.write()?;

        let book = state
            .catalog
            .find_book(&loan.book_id)
            .ok_or_else(|| DomainError::NotFound(format!("Book {} not found", loan.book_id)))?;
        if !book.available || state.ledger.find_active_loan(&loan.book_id).is_some() {
            return Err(DomainError::Conflict(format!(
                "Book {} is already on loan",
                loan.book_id
            )));
        }

        state.catalog.set_availability(&loan.book_id, false);
        state
            .ledger
            .record_loan(loan.book_id.clone(), loan.member_id.clone(), loan.borrow_date);
        Ok(())
    }

    async fn commit_return(
        &self,
        book_id: &BookId,
        return_date: NaiveDate,
    ) -> Result<Loan, DomainError> {
        let mut state = self.write()?;

        let closed = state
            .ledger
            .close_loan(book_id, return_date)
            .ok_or_else(|| DomainError::NotFound(format!("Book {} has no active loan", book_id)))?;
        state.catalog.set_availability(book_id, true);
        Ok(closed)
    }
}
