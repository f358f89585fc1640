//! Contact entity and the user-contact association row.
//!
//! The association is declared schema only: reading a user never joins its
//! contacts. Foreign keys cascade so join rows disappear with either side.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

pub type ContactId = i64;

/// Persisted contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub permanent_address: Option<String>,
    pub current_address: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Insert payload for a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub permanent_address: Option<String>,
    pub current_address: Option<String>,
}

/// Many-to-many join row between a user and a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContact {
    pub user_id: UserId,
    pub contact_id: ContactId,
    pub created_at: i64,
}
