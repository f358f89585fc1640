//! Entity definitions for the user book.
//!
//! # Responsibility
//! - Define the persisted record shapes (`User`, `Contact`, `UserContact`).
//! - Expose derived attributes such as `User::full_name`.
//!
//! # Invariants
//! - Ids are store-assigned integers and never change after insert.
//! - Deletion is physical; there are no tombstones.

pub mod contact;
pub mod user;
