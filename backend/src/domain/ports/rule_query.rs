//! Driving port for reading rules.

use async_trait::async_trait;

use crate::domain::{Error, Rule, RuleId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleQuery: Send + Sync {
    /// The actor's rules, default first, then newest first.
    async fn list(&self, actor: UserId) -> Result<Vec<Rule>, Error>;

    /// A single rule owned by the actor.
    async fn get(&self, actor: UserId, rule_id: RuleId) -> Result<Rule, Error>;
}
