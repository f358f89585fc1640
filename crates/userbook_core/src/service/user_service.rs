//! User record-access operations.
//!
//! # Responsibility
//! - Expose list/get/create/update/delete over users.
//! - Classify failures as validation, not-found or internal errors.
//!
//! # Invariants
//! - Validation always completes before any repository write.
//! - `get` and `delete` never report success for a missing id.
//! - `update` reports the affected-row count, not the updated row.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::{RepoError, UserRepository};
use crate::validation::{
    normalize_for_create, normalize_for_update, UserFields, UserValidationError,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-visible message for a missing user.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// Coarse failure classification shared with outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationError,
    NotFound,
    InternalError,
}

impl ErrorKind {
    /// HTTP-equivalent status code.
    pub fn status_code(self) -> u16 {
        match self {
            Self::ValidationError => 400,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }
}

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    /// Input rejected by the validation pipeline; nothing was written.
    Validation(UserValidationError),
    /// Target user does not exist.
    NotFound(UserId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl UserServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repo(_) => ErrorKind::InternalError,
        }
    }
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(_) => write!(f, "{USER_NOT_FOUND_MESSAGE}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<UserValidationError> for UserServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity: "user", id } => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Use-case service wrapper for user record access.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all users ordered by id.
    pub fn list_users(&self) -> UserServiceResult<Vec<User>> {
        Ok(self.repo.list_users()?)
    }

    /// Gets one user by id.
    pub fn get_user(&self, id: UserId) -> UserServiceResult<User> {
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::NotFound(id))
    }

    /// Validates, transforms and persists a new user.
    ///
    /// # Contract
    /// - Both `firstName` and `lastName` are required.
    /// - Returns the stored row with transformed names.
    pub fn create_user(&self, fields: &UserFields) -> UserServiceResult<User> {
        let new_user = normalize_for_create(fields).inspect_err(log_rejection("create"))?;
        let user = self.repo.insert_user(&new_user)?;
        info!(
            "event=user_create module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Validates and applies the supplied subset of fields.
    ///
    /// # Contract
    /// - Returns the affected-row count (0 when the id is unknown or no
    ///   field was supplied, 1 otherwise).
    pub fn update_user(&self, id: UserId, fields: &UserFields) -> UserServiceResult<usize> {
        let changes = normalize_for_update(fields).inspect_err(log_rejection("update"))?;
        let changed = self.repo.update_user(id, &changes)?;
        info!("event=user_update module=service status=ok user_id={id} changed={changed}");
        Ok(changed)
    }

    /// Physically deletes a user.
    ///
    /// # Contract
    /// - Returns the affected-row count (always 1 on success).
    /// - A zero-row outcome is reported as `NotFound`.
    pub fn delete_user(&self, id: UserId) -> UserServiceResult<usize> {
        let changed = self.repo.delete_user(id)?;
        if changed == 0 {
            return Err(UserServiceError::NotFound(id));
        }
        info!("event=user_delete module=service status=ok user_id={id} changed={changed}");
        Ok(changed)
    }
}

fn log_rejection(operation: &'static str) -> impl Fn(&UserValidationError) {
    move |err| {
        let field = err.first().map_or("unknown", |violation| violation.field.as_str());
        warn!(
            "event=user_{operation} module=service status=rejected field={field} violations={}",
            err.violations().len()
        );
    }
}
