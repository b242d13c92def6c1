//! Mock implementations of port traits

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::adapters::InMemoryLibraryRepository;
use crate::domain::entities::{Book, BookId, Loan, Member, MemberId, NewBook, NewMember};
use crate::domain::ports::{CatalogRepository, LibraryRepository, LoanRepository};
use crate::error::DomainError;

// ============================================================================
// Failing Library Repository
// ============================================================================

/// Delegates to an in-memory repository, but can be told to fail reads or
/// the borrow/return commits with a database error.
pub struct FailingLibraryRepository {
    inner: InMemoryLibraryRepository,
    fail_reads: AtomicBool,
    fail_commits: AtomicBool,
}

impl FailingLibraryRepository {
    pub fn new(inner: InMemoryLibraryRepository) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_commits: AtomicBool::new(false),
        }
    }

    /// Reads succeed, borrow/return commits fail
    pub fn failing_commits(inner: InMemoryLibraryRepository) -> Self {
        let repo = Self::new(inner);
        repo.fail_commits.store(true, Ordering::SeqCst);
        repo
    }

    /// Every catalog and ledger read fails
    pub fn failing_reads(inner: InMemoryLibraryRepository) -> Self {
        let repo = Self::new(inner);
        repo.fail_reads.store(true, Ordering::SeqCst);
        repo
    }

    fn check_read(&self) -> Result<(), DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::Database("connection reset".to_string()));
        }
        Ok(())
    }

    fn check_commit(&self) -> Result<(), DomainError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(DomainError::Database("transaction aborted".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for FailingLibraryRepository {
    async fn add_book(&self, book: &NewBook) -> Result<Book, DomainError> {
        self.inner.add_book(book).await
    }

    async fn register_member(&self, member: &NewMember) -> Result<Member, DomainError> {
        self.inner.register_member(member).await
    }

    async fn find_book(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        self.check_read()?;
        self.inner.find_book(id).await
    }

    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        self.check_read()?;
        self.inner.find_member(id).await
    }

    async fn member_exists(&self, id: &MemberId) -> Result<bool, DomainError> {
        self.check_read()?;
        self.inner.member_exists(id).await
    }

    async fn list_all_books(&self) -> Result<Vec<Book>, DomainError> {
        self.check_read()?;
        self.inner.list_all_books().await
    }

    async fn list_available_books(&self) -> Result<Vec<Book>, DomainError> {
        self.check_read()?;
        self.inner.list_available_books().await
    }
}

#[async_trait]
impl LoanRepository for FailingLibraryRepository {
    async fn find_active_loan(&self, book_id: &BookId) -> Result<Option<Loan>, DomainError> {
        self.check_read()?;
        self.inner.find_active_loan(book_id).await
    }

    async fn list_active_loans(&self) -> Result<Vec<Loan>, DomainError> {
        self.check_read()?;
        self.inner.list_active_loans().await
    }
}

#[async_trait]
impl LibraryRepository for FailingLibraryRepository {
    async fn commit_borrow(&self, loan: &Loan) -> Result<(), DomainError> {
        self.check_commit()?;
        self.inner.commit_borrow(loan).await
    }

    async fn commit_return(
        &self,
        book_id: &BookId,
        return_date: NaiveDate,
    ) -> Result<Loan, DomainError> {
        self.check_commit()?;
        self.inner.commit_return(book_id, return_date).await
    }
}
