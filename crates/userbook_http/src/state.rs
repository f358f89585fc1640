//! Shared application state.
//!
//! The store connection is opened once at startup and handed to every
//! request through `web::Data<AppState>`.

use crate::error::{ApiError, ApiResult};
use log::error;
use rusqlite::Connection;
use std::sync::Mutex;
use userbook_core::{SqliteUserRepository, UserService, UserServiceResult};

pub struct AppState {
    conn: Mutex<Connection>,
}

impl AppState {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `f` against a user service bound to the shared connection.
    ///
    /// Blocking; call from `web::block` inside handlers.
    pub fn with_user_service<T>(
        &self,
        f: impl FnOnce(&UserService<SqliteUserRepository<'_>>) -> UserServiceResult<T>,
    ) -> ApiResult<T> {
        let conn = self.conn.lock().map_err(|_| {
            error!("event=state_lock module=http status=error error_code=lock_poisoned");
            ApiError::Internal
        })?;
        let repo = SqliteUserRepository::try_new(&conn).map_err(|err| {
            error!("event=state_repo module=http status=error error={err}");
            ApiError::Internal
        })?;
        let service = UserService::new(repo);
        f(&service).map_err(ApiError::from)
    }
}
