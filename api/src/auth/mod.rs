//! Caller authentication
//!
//! HTTP Basic credentials, classified as the library manager or a member.

pub mod basic;

pub use basic::{auth_middleware, authenticate, hash_password, Caller, Role};
