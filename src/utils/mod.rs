//! Shared utilities: error types, JWT helpers, password hashing.

pub mod errors;
pub mod jwt;
pub mod password;
