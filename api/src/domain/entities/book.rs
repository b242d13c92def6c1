//! Book domain entity
//!
//! A catalog entry that members can borrow. Availability is only ever
//! changed by the borrow/return transitions of the library service.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Unique identifier for a book (e.g. "B1")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl BookId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// True iff no active loan references this book
    pub available: bool,
}

impl Book {
    /// Case-insensitive match of `needle` against title or author.
    /// An empty needle matches everything.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.author.to_lowercase().contains(&needle)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} by {} ({})",
            self.id,
            self.title,
            self.author,
            if self.available { "available" } else { "borrowed" }
        )
    }
}

/// Data needed to register a book
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub id: BookId,
    pub title: String,
    pub author: String,
}

impl NewBook {
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: BookId(id.into()),
            title: title.into(),
            author: author.into(),
        }
    }

    /// Trim all fields and reject a blank id or title
    pub fn normalized(self) -> Result<Self, DomainError> {
        let id = self.id.0.trim().to_string();
        let title = self.title.trim().to_string();
        let author = self.author.trim().to_string();

        if id.is_empty() {
            return Err(DomainError::Validation("Book ID must not be empty".to_string()));
        }
        if title.is_empty() {
            return Err(DomainError::Validation(format!(
                "Book '{}' must have a title",
                id
            )));
        }

        Ok(Self {
            id: BookId(id),
            title,
            author,
        })
    }

    /// Materialize a freshly registered book, which is always available
    pub fn into_book(self) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            available: true,
        }
    }
}
