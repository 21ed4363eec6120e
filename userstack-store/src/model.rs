//! User record types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user record
///
/// `id` and `created_at` are assigned once by [`User::create`] and never change.
/// `name` and `email` serialize as `null` once an update has cleared them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
}

/// Field values for a record about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Replacement values for the mutable fields of a record
///
/// Both fields are written on every update: `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Build a fresh record with a generated id and the current time
    pub fn create(new: NewUser) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: Some(new.name),
            email: Some(new.email),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Overwrite `name` and `email`, leaving `id` and `created_at` alone
    pub fn apply(&mut self, update: UserUpdate) {
        self.name = update.name;
        self.email = update.email;
    }
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Generated stand-in values, used when the create body is not trusted
    pub fn placeholder() -> Self {
        let tag = &Uuid::new_v4().simple().to_string()[..8];
        Self {
            name: format!("user-{tag}"),
            email: format!("user-{tag}@example.com"),
        }
    }
}
