//! Core domain logic for the user book backend.
//! This crate owns the user validation pipeline, the entity schema and the
//! record-access operations; transports live in outer crates.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{
    active_log_settings, default_log_level, init_logging, LogSettings, LoggingError,
    ACCESS_LOG_TARGET,
};
pub use model::contact::{Contact, ContactId, NewContact, UserContact};
pub use model::user::{User, UserId};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::user_repo::{RepoError, RepoResult, SqliteUserRepository, UserRepository};
pub use service::user_service::{
    ErrorKind, UserService, UserServiceError, UserServiceResult, USER_NOT_FOUND_MESSAGE,
};
pub use validation::{
    FieldViolation, NewUser, UserChanges, UserField, UserFields, UserValidationError,
    ValidationRule,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
