//! User identity record.
//!
//! Authentication and session state live outside this core; the record
//! exists so authorship and notification routing have stable identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a registered user.
pub type UserId = Uuid;

/// Minimal user record used for authorship and notification routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique display handle.
    pub username: String,
    /// Unique contact address.
    pub email: String,
}

impl User {
    /// Creates a new user with a generated stable ID.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), username, email)
    }

    /// Creates a user with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }
}
