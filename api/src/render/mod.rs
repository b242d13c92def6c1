//! Render module
//!
//! Plain-text rendering of catalog and loan data for non-JSON clients.

pub mod renderer;

pub use renderer::{render_book, render_books, render_caller, render_loan, render_loans, render_member};
