//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `users` table.
//! - Translate SQLite outcomes into rows and affected-row counts.
//!
//! # Invariants
//! - Inserts and updates only accept values produced by the validation
//!   pipeline, so stored names always carry their transform markers.
//! - Read paths reject rows missing those markers instead of masking them.

use crate::db::DbError;
use crate::model::user::{User, UserId};
use crate::repo::schema::ensure_connection_ready;
use crate::validation::{NewUser, UserChanges, FIRST_NAME_PREFIX, LAST_NAME_SUFFIX};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USER_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    created_at,
    updated_at
FROM users";

const USER_COLUMNS: &[&str] = &["id", "first_name", "last_name", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user/contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A referenced row does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    /// Inserts a user and returns the stored row.
    fn insert_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Lists every user ordered by id.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Applies present fields only; returns the affected-row count.
    fn update_user(&self, id: UserId, changes: &UserChanges) -> RepoResult<usize>;
    /// Physically removes the user; returns the affected-row count.
    fn delete_user(&self, id: UserId) -> RepoResult<usize>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("users", USER_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &NewUser) -> RepoResult<User> {
        self.conn.execute(
            "INSERT INTO users (first_name, last_name) VALUES (?1, ?2);",
            params![user.first_name(), user.last_name()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=user_insert module=repo status=ok user_id={id}");

        self.get_user(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted user {id} could not be read back"))
        })
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(read_user_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(read_user_row(row)?);
        }

        Ok(users)
    }

    fn update_user(&self, id: UserId, changes: &UserChanges) -> RepoResult<usize> {
        if changes.is_empty() {
            return Ok(0);
        }

        let changed = self.conn.execute(
            "UPDATE users
             SET
                first_name = COALESCE(?1, first_name),
                last_name = COALESCE(?2, last_name),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![changes.first_name(), changes.last_name(), id],
        )?;
        debug!("event=user_update module=repo status=ok user_id={id} changed={changed}");

        Ok(changed)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])?;
        debug!("event=user_delete module=repo status=ok user_id={id} changed={changed}");

        Ok(changed)
    }
}

fn read_user_row(row: &Row<'_>) -> RepoResult<User> {
    let user = User {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };

    if !user.first_name.starts_with(FIRST_NAME_PREFIX) {
        return Err(RepoError::InvalidData(format!(
            "users.first_name of user {} lacks the `{FIRST_NAME_PREFIX}` prefix",
            user.id
        )));
    }
    if !user.last_name.ends_with(LAST_NAME_SUFFIX) {
        return Err(RepoError::InvalidData(format!(
            "users.last_name of user {} lacks the `{LAST_NAME_SUFFIX}` suffix",
            user.id
        )));
    }

    Ok(user)
}
