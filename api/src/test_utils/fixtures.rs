//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::collections::HashSet;
use std::sync::Arc;

use crate::adapters::InMemoryLibraryRepository;
use crate::app::LibraryService;
use crate::config::Config;
use crate::domain::entities::{NewBook, NewMember};
use crate::domain::ports::LibraryRepository;

/// Three books (B1..B3) and two members (M1, M2)
pub fn seeded_repository() -> InMemoryLibraryRepository {
    InMemoryLibraryRepository::new()
        .with_book(NewBook::new("B1", "1984", "George Orwell"))
        .with_book(NewBook::new("B2", "Brave New World", "Aldous Huxley"))
        .with_book(NewBook::new("B3", "The Hobbit", "J.R.R. Tolkien"))
        .with_member(NewMember::new("M1", "Alice"))
        .with_member(NewMember::new("M2", "Bob"))
}

/// Manager password used by `test_config`
pub const TEST_MANAGER_PASSWORD: &str = "test-manager-secret";

/// Config with an in-memory store and a known manager credential
pub fn test_config() -> Config {
    Config {
        database_url: None,
        port: 8080,
        manager_username: "manager".to_string(),
        manager_password_sha256: Some(crate::auth::hash_password(TEST_MANAGER_PASSWORD)),
        seed_demo_data: false,
    }
}

/// Service over the seeded repository, usable as the server would use it
pub fn seeded_service() -> Arc<LibraryService<dyn LibraryRepository>> {
    let repo: Arc<dyn LibraryRepository> = Arc::new(seeded_repository());
    Arc::new(LibraryService::new(repo))
}

/// Every book is available iff it has no active loan, and no book has more
/// than one active loan.
pub async fn assert_availability_consistent<R>(service: &LibraryService<R>)
where
    R: LibraryRepository + ?Sized,
{
    let loans = service.list_loans().await.unwrap();
    let mut on_loan = HashSet::new();
    for loan in &loans {
        assert!(loan.is_active(), "listed loan {} is closed", loan);
        assert!(
            on_loan.insert(loan.book_id.clone()),
            "book {} has more than one active loan",
            loan.book_id
        );
    }

    for book in service.list_all_books().await.unwrap() {
        assert_eq!(
            book.available,
            !on_loan.contains(&book.id),
            "availability of {} disagrees with the ledger",
            book.id
        );
    }
}
