//! SQL adapters
//!
//! Implementation of the repository traits using SeaORM.
//! PostgreSQL in production, SQLite for local use and tests.

pub mod library_repo;


pub use library_repo::SqlLibraryRepository;
