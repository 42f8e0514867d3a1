//! Feature modules.
//!
//! Each module follows the same structure: `model.rs` (DTOs and database
//! structs), `service.rs` (business logic against the pool),
//! `controller.rs` (HTTP handlers), `router.rs` (route wiring).

pub mod auth;
pub mod catalogs;
pub mod lessons;
pub mod stages;
pub mod teachers;
pub mod timeslots;
pub mod users;
