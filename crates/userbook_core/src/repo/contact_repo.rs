//! Contact and user-contact association persistence.
//!
//! # Invariants
//! - Linking requires both the user and the contact to exist.
//! - Linking the same pair twice keeps a single join row.
//! - Join rows are removed by foreign-key cascade when either side is deleted.

use crate::model::contact::{Contact, ContactId, NewContact, UserContact};
use crate::model::user::UserId;
use crate::repo::schema::ensure_connection_ready;
use crate::repo::user_repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    contacts.id,
    contacts.permanent_address,
    contacts.current_address,
    contacts.created_at,
    contacts.updated_at
FROM contacts";

const CONTACT_COLUMNS: &[&str] = &[
    "id",
    "permanent_address",
    "current_address",
    "created_at",
    "updated_at",
];
const USER_CONTACT_COLUMNS: &[&str] = &["user_id", "contact_id", "created_at"];

/// Repository interface for contacts and their user links.
pub trait ContactRepository {
    fn create_contact(&self, contact: &NewContact) -> RepoResult<Contact>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn list_contacts(&self) -> RepoResult<Vec<Contact>>;
    /// Returns the affected-row count.
    fn delete_contact(&self, id: ContactId) -> RepoResult<usize>;
    /// Links a user and a contact; idempotent for an existing pair.
    fn link_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<UserContact>;
    /// Returns the affected-row count.
    fn unlink_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<usize>;
    /// Lists contacts linked to `user_id`, ordered by contact id.
    fn list_user_contacts(&self, user_id: UserId) -> RepoResult<Vec<Contact>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                ("contacts", CONTACT_COLUMNS),
                ("user_contacts", USER_CONTACT_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }

    fn ensure_exists(&self, table: &'static str, entity: &'static str, id: i64) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
            [id],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::NotFound { entity, id });
        }
        Ok(())
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &NewContact) -> RepoResult<Contact> {
        self.conn.execute(
            "INSERT INTO contacts (permanent_address, current_address) VALUES (?1, ?2);",
            params![
                contact.permanent_address.as_deref(),
                contact.current_address.as_deref()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=contact_insert module=repo status=ok contact_id={id}");

        self.get_contact(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted contact {id} could not be read back"))
        })
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let contact = self
            .conn
            .query_row(
                &format!("{CONTACT_SELECT_SQL} WHERE contacts.id = ?1;"),
                [id],
                read_contact_row,
            )
            .optional()?;
        Ok(contact)
    }

    fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY contacts.id ASC;"))?;
        let contacts = stmt
            .query_map([], read_contact_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;
        Ok(changed)
    }

    fn link_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<UserContact> {
        self.ensure_exists("users", "user", user_id)?;
        self.ensure_exists("contacts", "contact", contact_id)?;

        self.conn.execute(
            "INSERT OR IGNORE INTO user_contacts (user_id, contact_id) VALUES (?1, ?2);",
            params![user_id, contact_id],
        )?;
        debug!(
            "event=contact_link module=repo status=ok user_id={user_id} contact_id={contact_id}"
        );

        let link = self.conn.query_row(
            "SELECT user_id, contact_id, created_at
             FROM user_contacts
             WHERE user_id = ?1 AND contact_id = ?2;",
            params![user_id, contact_id],
            |row| {
                Ok(UserContact {
                    user_id: row.get(0)?,
                    contact_id: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )?;
        Ok(link)
    }

    fn unlink_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM user_contacts WHERE user_id = ?1 AND contact_id = ?2;",
            params![user_id, contact_id],
        )?;
        Ok(changed)
    }

    fn list_user_contacts(&self, user_id: UserId) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL}
             INNER JOIN user_contacts ON user_contacts.contact_id = contacts.id
             WHERE user_contacts.user_id = ?1
             ORDER BY contacts.id ASC;"
        ))?;
        let contacts = stmt
            .query_map([user_id], read_contact_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }
}

fn read_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        permanent_address: row.get(1)?,
        current_address: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
