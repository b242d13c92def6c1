//! SeaORM entities
//!
//! Table models for the SQL adapter. Domain code never sees these types;
//! adapters convert them into `domain::entities`.

pub mod books;
pub mod loans;
pub mod members;
