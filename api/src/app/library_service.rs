//! Library Service
//!
//! Owns the borrow/return state machine. A book is either Available (no
//! active loan) or OnLoan (exactly one). Borrow and return run their
//! check-then-act sequence under a single lending lock so that concurrent
//! callers cannot both see a book as Available.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::domain::entities::{Book, BookId, Loan, Member, MemberId, NewBook, NewMember};
use crate::domain::ports::LibraryRepository;
use crate::error::{DomainError, LendingError};

/// Service for catalog registration, lending and queries
pub struct LibraryService<R>
where
    R: LibraryRepository + ?Sized,
{
    repo: Arc<R>,
    /// Serializes borrow/return
    lending: Mutex<()>,
}

impl<R> LibraryService<R>
where
    R: LibraryRepository + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            lending: Mutex::new(()),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // === Registration ===

    /// Register or replace a book
    pub async fn add_book(&self, book: NewBook) -> Result<Book, DomainError> {
        let book = book.normalized()?;
        let saved = self.repo.add_book(&book).await?;
        tracing::info!(book_id = %saved.id, title = %saved.title, "Book registered");
        Ok(saved)
    }

    /// Register or replace a member
    pub async fn register_member(&self, member: NewMember) -> Result<Member, DomainError> {
        let member = member.normalized()?;
        let saved = self.repo.register_member(&member).await?;
        tracing::info!(member_id = %saved.id, "Member registered");
        Ok(saved)
    }

    // === Lending ===

    /// Lend a book to a member.
    ///
    /// Fails without changing anything if the book or member is unknown or
    /// the book is already on loan.
    pub async fn borrow_book(
        &self,
        book_id: &BookId,
        member_id: &MemberId,
    ) -> Result<Loan, LendingError> {
        let _guard = self.lending.lock().await;

        let book = self
            .repo
            .find_book(book_id)
            .await?
            .ok_or_else(|| LendingError::UnknownBook(book_id.clone()))?;

        if !self.repo.member_exists(member_id).await? {
            tracing::warn!(book_id = %book_id, member_id = %member_id, "Borrow refused: unknown member");
            return Err(LendingError::UnknownMember(member_id.clone()));
        }

        if !book.available || self.repo.find_active_loan(book_id).await?.is_some() {
            tracing::warn!(book_id = %book_id, member_id = %member_id, "Borrow refused: already on loan");
            return Err(LendingError::AlreadyOnLoan(book_id.clone()));
        }

        let loan = Loan::open(book_id.clone(), member_id.clone(), Self::today());
        self.repo.commit_borrow(&loan).await.map_err(|e| match e {
            DomainError::Conflict(_) => LendingError::AlreadyOnLoan(book_id.clone()),
            DomainError::NotFound(_) => LendingError::UnknownBook(book_id.clone()),
            other => {
                tracing::error!(book_id = %book_id, error = %other, "Borrow failed in storage");
                LendingError::Storage(other)
            }
        })?;

        tracing::info!(book_id = %book_id, member_id = %member_id, "Book borrowed");
        Ok(loan)
    }

    /// Take a book back, closing its active loan.
    ///
    /// Fails if the book has no active loan (unknown or already available).
    pub async fn return_book(&self, book_id: &BookId) -> Result<Loan, LendingError> {
        let _guard = self.lending.lock().await;

        if self.repo.find_active_loan(book_id).await?.is_none() {
            tracing::warn!(book_id = %book_id, "Return refused: no active loan");
            return Err(LendingError::NoActiveLoan(book_id.clone()));
        }

        let closed = self
            .repo
            .commit_return(book_id, Self::today())
            .await
            .map_err(|e| match e {
                DomainError::NotFound(_) => LendingError::NoActiveLoan(book_id.clone()),
                other => {
                    tracing::error!(book_id = %book_id, error = %other, "Return failed in storage");
                    LendingError::Storage(other)
                }
            })?;

        tracing::info!(book_id = %book_id, member_id = %closed.member_id, "Book returned");
        Ok(closed)
    }

    // === Queries ===

    pub async fn list_all_books(&self) -> Result<Vec<Book>, DomainError> {
        self.repo.list_all_books().await
    }

    pub async fn list_available_books(&self) -> Result<Vec<Book>, DomainError> {
        self.repo.list_available_books().await
    }

    /// Active loans
    pub async fn list_loans(&self) -> Result<Vec<Loan>, DomainError> {
        self.repo.list_active_loans().await
    }

    pub async fn find_book(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        self.repo.find_book(id).await
    }

    pub async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        self.repo.find_member(id).await
    }

    pub async fn member_exists(&self, id: &MemberId) -> Result<bool, DomainError> {
        self.repo.member_exists(id).await
    }

    /// Books whose title or author contains `query`, ignoring case
    pub async fn search_books(&self, query: &str) -> Result<Vec<Book>, DomainError> {
        let books = self.repo.list_all_books().await?;
        Ok(books.into_iter().filter(|b| b.matches(query)).collect())
    }

    /// Register the starter catalog if no books exist yet.
    ///
    /// Returns true if anything was seeded.
    pub async fn seed_demo_catalog(&self) -> Result<bool, DomainError> {
        if !self.repo.list_all_books().await?.is_empty() {
            return Ok(false);
        }

        for book in [
            NewBook::new("B1", "1984", "George Orwell"),
            NewBook::new("B2", "Brave New World", "Aldous Huxley"),
            NewBook::new("B3", "The Hobbit", "J.R.R. Tolkien"),
        ] {
            self.repo.add_book(&book).await?;
        }
        for member in [NewMember::new("M1", "Alice"), NewMember::new("M2", "Bob")] {
            self.repo.register_member(&member).await?;
        }

        tracing::info!("Seeded demo catalog");
        Ok(true)
    }
}
