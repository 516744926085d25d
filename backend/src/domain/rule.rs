//! Scoring rules registered by users.
//!
//! A rule pairs a name with the point parameters used by [`ScoringRule`].
//! Each owner may flag at most one rule as their default; the persistence
//! adapter clears the previous default when a write sets the flag.

use chrono::{DateTime, Utc};

use super::{RuleId, ScoringRule, Uma, UserId};

/// Maximum length of a rule name, in characters.
pub const RULE_NAME_MAX: usize = 255;

/// Validation errors for rule input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleValidationError {
    #[error("rule name must not be empty")]
    EmptyName,
    #[error("rule name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Human readable rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleName(String);

impl RuleName {
    /// Validate and construct a rule name.
    pub fn new(name: impl Into<String>) -> Result<Self, RuleValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RuleValidationError::EmptyName);
        }
        if name.chars().count() > RULE_NAME_MAX {
            return Err(RuleValidationError::NameTooLong { max: RULE_NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for RuleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored scoring rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub owner: UserId,
    pub name: RuleName,
    pub scoring: ScoringRule,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a rule. Omitted point values take the defaults of
/// [`ScoringRule::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDraft {
    pub name: RuleName,
    pub scoring: ScoringRule,
    pub is_default: bool,
}

/// Partial update of a rule; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePatch {
    pub name: Option<RuleName>,
    pub starting_points: Option<i32>,
    pub return_points: Option<i32>,
    pub uma: [Option<i32>; 4],
    pub oka: Option<i32>,
    pub is_default: Option<bool>,
}

impl Rule {
    /// Build a new rule for `owner` from a draft.
    pub fn from_draft(id: RuleId, owner: UserId, draft: RuleDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            name: draft.name,
            scoring: draft.scoring,
            is_default: draft.is_default,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, stamping `updated_at`.
    pub fn apply(&mut self, patch: RulePatch, now: DateTime<Utc>) {
        let RulePatch {
            name,
            starting_points,
            return_points,
            uma,
            oka,
            is_default,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(value) = starting_points {
            self.scoring.starting_points = value;
        }
        if let Some(value) = return_points {
            self.scoring.return_points = value;
        }
        let mut values = self.scoring.uma.values();
        for (slot, value) in values.iter_mut().zip(uma) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        self.scoring.uma = Uma::new(values);
        if let Some(value) = oka {
            self.scoring.oka = value;
        }
        if let Some(value) = is_default {
            self.is_default = value;
        }
        self.updated_at = now;
    }

    /// Whether `user` may read or change this rule.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}
