//! User entity.
//!
//! # Invariants
//! - `first_name` always carries the `"Mr. "` prefix once persisted.
//! - `last_name` always carries the `" ,Indian"` suffix once persisted.
//! - `full_name` is derived, never stored.

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Store-assigned user identifier.
pub type UserId = i64;

/// Persisted user row as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Transformed first name, e.g. `Mr. ARUN`.
    pub first_name: String,
    /// Transformed last name, e.g. `kumar ,Indian`.
    pub last_name: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl User {
    /// Derived display name joining the stored first and last name.
    ///
    /// ```
    /// use userbook_core::User;
    ///
    /// let user = User {
    ///     id: 1,
    ///     first_name: "Mr. ARUN".to_string(),
    ///     last_name: "kumar ,Indian".to_string(),
    ///     created_at: 0,
    ///     updated_at: 0,
    /// };
    /// assert_eq!(user.full_name(), "Mr. ARUN kumar ,Indian");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// Hand-written so the derived `fullName` travels with every serialized user.
impl Serialize for User {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("User", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("firstName", &self.first_name)?;
        state.serialize_field("lastName", &self.last_name)?;
        state.serialize_field("fullName", &self.full_name())?;
        state.serialize_field("createdAt", &self.created_at)?;
        state.serialize_field("updatedAt", &self.updated_at)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::User;

    #[test]
    fn full_name_joins_with_single_space() {
        let user = User {
            id: 7,
            first_name: "Mr. JANEE".to_string(),
            last_name: "smith ,Indian".to_string(),
            created_at: 1,
            updated_at: 2,
        };
        assert_eq!(user.full_name(), "Mr. JANEE smith ,Indian");
    }
}
