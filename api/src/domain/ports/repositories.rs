//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (in-memory, SQL).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{Book, BookId, Loan, Member, MemberId, NewBook, NewMember};
use crate::error::DomainError;

/// Repository for Book and Member records
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert or replace a book by id (last write wins on title/author).
    /// A book that is currently on loan stays on loan.
    async fn add_book(&self, book: &NewBook) -> Result<Book, DomainError>;

    /// Insert or replace a member by id (last write wins)
    async fn register_member(&self, member: &NewMember) -> Result<Member, DomainError>;

    /// Find a book by ID
    async fn find_book(&self, id: &BookId) -> Result<Option<Book>, DomainError>;

    /// Find a member by ID
    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;

    /// Check whether a member is registered
    async fn member_exists(&self, id: &MemberId) -> Result<bool, DomainError>;

    /// List every book in the catalog
    async fn list_all_books(&self) -> Result<Vec<Book>, DomainError>;

    /// List books whose availability flag is set
    async fn list_available_books(&self) -> Result<Vec<Book>, DomainError>;
}

/// Repository for active loans, keyed by book
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find the active loan for a book
    async fn find_active_loan(&self, book_id: &BookId) -> Result<Option<Loan>, DomainError>;

    /// List all active loans
    async fn list_active_loans(&self) -> Result<Vec<Loan>, DomainError>;
}

/// Full storage contract used by the library service.
///
/// The two commit operations are the only writers of availability and loan
/// state. Each must apply both of its changes or neither.
#[async_trait]
pub trait LibraryRepository: CatalogRepository + LoanRepository {
    /// Mark the book on loan and record the loan.
    ///
    /// Fails with `DomainError::Conflict` if the book is not available and
    /// with `DomainError::NotFound` if it does not exist.
    async fn commit_borrow(&self, loan: &Loan) -> Result<(), DomainError>;

    /// Close the active loan for a book and mark the book available.
    ///
    /// Returns the closed loan, or `DomainError::NotFound` if the book has no
    /// active loan.
    async fn commit_return(
        &self,
        book_id: &BookId,
        return_date: NaiveDate,
    ) -> Result<Loan, DomainError>;
}
