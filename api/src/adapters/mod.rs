//! Adapters layer
//!
//! Implementations of port traits for storage backends.

pub mod memory;
pub mod sql;

pub use memory::InMemoryLibraryRepository;
pub use sql::SqlLibraryRepository;
