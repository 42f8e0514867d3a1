//! Middleware modules for request processing.
//!
//! # Authentication Flow
//!
//! 1. Client sends a request with an `Authorization: Bearer <token>` header
//! 2. [`auth::AuthUser`] validates the JWT and extracts the claims
//! 3. Role extractors ([`role::RequireAdmin`] etc.) check the caller's role
//! 4. The handler executes if all checks pass
//!
//! Unauthenticated callers receive 401; authenticated callers with the
//! wrong role receive 403.

pub mod auth;
pub mod role;
