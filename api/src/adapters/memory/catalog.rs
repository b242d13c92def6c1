//! Catalog store
//!
//! Book and Member records keyed by identifier. Books are listed in the
//! order they were first registered.

use std::collections::HashMap;

use crate::domain::entities::{Book, BookId, Member, MemberId, NewBook, NewMember};

#[derive(Debug, Default)]
pub struct CatalogStore {
    books: HashMap<BookId, Book>,
    /// First-registration order of book ids
    order: Vec<BookId>,
    members: HashMap<MemberId, Member>,
}

impl CatalogStore {
    /// Insert or replace a book. Replacing keeps the current availability.
    pub fn add_book(&mut self, new_book: NewBook) -> Book {
        match self.books.get_mut(&new_book.id) {
            Some(existing) => {
                existing.title = new_book.title;
                existing.author = new_book.author;
                existing.clone()
            }
            None => {
                let book = new_book.into_book();
                self.order.push(book.id.clone());
                self.books.insert(book.id.clone(), book.clone());
                book
            }
        }
    }

    /// Insert or replace a member
    pub fn register_member(&mut self, new_member: NewMember) -> Member {
        let member = new_member.into_member();
        self.members.insert(member.id.clone(), member.clone());
        member
    }

    pub fn find_book(&self, id: &BookId) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn find_member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn member_exists(&self, id: &MemberId) -> bool {
        self.members.contains_key(id)
    }

    pub fn list_all_books(&self) -> Vec<Book> {
        self.order
            .iter()
            .filter_map(|id| self.books.get(id))
            .cloned()
            .collect()
    }

    pub fn list_available_books(&self) -> Vec<Book> {
        self.order
            .iter()
            .filter_map(|id| self.books.get(id))
            .filter(|b| b.available)
            .cloned()
            .collect()
    }

    /// Set the availability flag. Returns false if the book is unknown.
    pub fn set_availability(&mut self, id: &BookId, available: bool) -> bool {
        match self.books.get_mut(id) {
            Some(book) => {
                book.available = available;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_books_in_registration_order() {
        let mut catalog = CatalogStore::default();
        catalog.add_book(NewBook::new("B2", "Brave New World", "Aldous Huxley"));
        catalog.add_book(NewBook::new("B1", "1984", "George Orwell"));

        let ids: Vec<_> = catalog
            .list_all_books()
            .into_iter()
            .map(|b| b.id.0)
            .collect();
        assert_eq!(ids, vec!["B2", "B1"]);
    }

    #[test]
    fn add_book_replaces_descriptive_fields() {
        let mut catalog = CatalogStore::default();
        catalog.add_book(NewBook::new("B1", "1984", "Orwell"));
        catalog.add_book(NewBook::new("B1", "Nineteen Eighty-Four", "George Orwell"));

        let all = catalog.list_all_books();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Nineteen Eighty-Four");
        assert_eq!(all[0].author, "George Orwell");
    }

    #[test]
    fn add_book_keeps_book_on_loan() {
        let mut catalog = CatalogStore::default();
        catalog.add_book(NewBook::new("B1", "1984", "George Orwell"));
        catalog.set_availability(&"B1".into(), false);

        let replaced = catalog.add_book(NewBook::new("B1", "1984", "G. Orwell"));
        assert!(!replaced.available);
        assert!(catalog.list_available_books().is_empty());
    }

    #[test]
    fn register_member_last_write_wins() {
        let mut catalog = CatalogStore::default();
        catalog.register_member(NewMember::new("M1", "Alice"));
        catalog.register_member(NewMember::new("M1", "Alicia"));

        assert!(catalog.member_exists(&"M1".into()));
        assert_eq!(catalog.find_member(&"M1".into()).unwrap().name, "Alicia");
        assert!(!catalog.member_exists(&"M2".into()));
    }

    #[test]
    fn available_listing_is_subset_of_all() {
        let mut catalog = CatalogStore::default();
        catalog.add_book(NewBook::new("B1", "1984", "George Orwell"));
        catalog.add_book(NewBook::new("B2", "Brave New World", "Aldous Huxley"));
        catalog.set_availability(&"B1".into(), false);

        let available = catalog.list_available_books();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, BookId::from("B2"));
    }

    #[test]
    fn set_availability_on_unknown_book() {
        let mut catalog = CatalogStore::default();
        assert!(!catalog.set_availability(&"B404".into(), false));
    }
}
