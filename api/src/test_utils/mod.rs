//! Test utilities
//!
//! Fixtures and hand-written mock repositories for unit testing.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
