//! User data model.
//!
//! Users are owned by the authentication collaborator. This service only
//! reads them to validate references and to decorate payloads.

use super::UserId;

/// Application user as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    display_name: String,
}

impl User {
    /// Build a user from stored components.
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other players.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}
