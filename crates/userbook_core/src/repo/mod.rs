//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for users and contacts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - User writes only accept pipeline output (`NewUser`, `UserChanges`).
//! - Write paths report affected-row counts; callers decide what zero means.
//! - Repositories refuse connections whose schema is not fully migrated.

pub mod contact_repo;
mod schema;
pub mod user_repo;
