//! Driving port for rule writes.

use async_trait::async_trait;

use crate::domain::{Error, Rule, RuleDraft, RuleId, RulePatch, UserId};

/// Request to register a rule for the acting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRuleRequest {
    pub actor: UserId,
    pub draft: RuleDraft,
}

/// Request to change a rule the acting user owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRuleRequest {
    pub actor: UserId,
    pub rule_id: RuleId,
    pub patch: RulePatch,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleCommand: Send + Sync {
    async fn create(&self, request: CreateRuleRequest) -> Result<Rule, Error>;

    /// # Errors
    ///
    /// `not_found` for an unknown rule, `forbidden` when the actor is not
    /// the owner.
    async fn update(&self, request: UpdateRuleRequest) -> Result<Rule, Error>;

    /// # Errors
    ///
    /// As for [`RuleCommand::update`].
    async fn delete(&self, actor: UserId, rule_id: RuleId) -> Result<(), Error>;
}
