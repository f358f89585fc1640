//! Core use-case services.
//!
//! # Responsibility
//! - Run the validation pipeline ahead of every user write.
//! - Map repository outcomes onto the record-access contract.
//! - Keep the HTTP layer decoupled from storage details.

pub mod user_service;
