//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod book;
pub mod loan;
pub mod member;

pub use book::{Book, BookId, NewBook};
pub use loan::Loan;
pub use member::{Member, MemberId, NewMember};
