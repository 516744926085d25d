//! Places where games are played.

use chrono::{DateTime, Utc};

use super::{LocationId, UserId};

/// Maximum length of a location name, in characters.
pub const LOCATION_NAME_MAX: usize = 255;

/// Validation errors for location input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationValidationError {
    #[error("location name must not be empty")]
    EmptyName,
    #[error("location name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Validated location name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationName(String);

impl LocationName {
    /// Reject blank names.
    pub fn new(name: impl Into<String>) -> Result<Self, LocationValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LocationValidationError::EmptyName);
        }
        if name.chars().count() > LOCATION_NAME_MAX {
            return Err(LocationValidationError::NameTooLong {
                max: LOCATION_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for LocationName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub owner: UserId,
    pub name: LocationName,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a location's details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDraft {
    pub name: LocationName,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl Location {
    /// Build a new location for `owner` from a draft.
    pub fn from_draft(
        id: LocationId,
        owner: UserId,
        draft: LocationDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            name: draft.name,
            address: draft.address,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable details, keeping identity and ownership.
    pub fn revise(&mut self, draft: LocationDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.address = draft.address;
        self.notes = draft.notes;
        self.updated_at = now;
    }

    /// Whether `user` may read or change this location.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}
