//! Rule domain service implementing the rule driving ports.
//!
//! Reads and writes are restricted to the rule's owner. The repository keeps
//! the single-default invariant; this service only decides who may write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateRuleRequest, RuleCommand, RuleQuery, RuleRepository, RuleRepositoryError,
    UpdateRuleRequest,
};
use crate::domain::{Error, Rule, RuleId, UserId};

/// Rule service implementing [`RuleCommand`] and [`RuleQuery`].
#[derive(Clone)]
pub struct RuleService<R> {
    rule_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> RuleService<R> {
    /// Create a new service over the given repository.
    pub fn new(rule_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { rule_repo, clock }
    }
}

pub(crate) fn map_rule_repository_error(error: RuleRepositoryError) -> Error {
    match error {
        RuleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rule repository unavailable: {message}"))
        }
        RuleRepositoryError::Query { message } => {
            Error::internal(format!("rule repository error: {message}"))
        }
    }
}

impl<R> RuleService<R>
where
    R: RuleRepository,
{
    /// Load a rule and check the actor owns it.
    async fn owned_rule(&self, actor: &UserId, rule_id: &RuleId) -> Result<Rule, Error> {
        let rule = self
            .rule_repo
            .find_by_id(rule_id)
            .await
            .map_err(map_rule_repository_error)?
            .ok_or_else(|| Error::not_found(format!("rule {rule_id} not found")))?;

        if !rule.is_owned_by(actor) {
            warn!(%actor, %rule_id, "rule access refused for non-owner");
            return Err(Error::forbidden("only the rule owner may access this rule"));
        }
        Ok(rule)
    }
}

#[async_trait]
impl<R> RuleCommand for RuleService<R>
where
    R: RuleRepository,
{
    async fn create(&self, request: CreateRuleRequest) -> Result<Rule, Error> {
        let CreateRuleRequest { actor, draft } = request;
        let rule = Rule::from_draft(RuleId::random(), actor, draft, self.clock.utc());

        self.rule_repo
            .create(&rule)
            .await
            .map_err(map_rule_repository_error)?;

        info!(rule_id = %rule.id, owner = %rule.owner, is_default = rule.is_default, "rule created");
        Ok(rule)
    }

    async fn update(&self, request: UpdateRuleRequest) -> Result<Rule, Error> {
        let UpdateRuleRequest {
            actor,
            rule_id,
            patch,
        } = request;
        let mut rule = self.owned_rule(&actor, &rule_id).await?;
        rule.apply(patch, self.clock.utc());

        self.rule_repo
            .update(&rule)
            .await
            .map_err(map_rule_repository_error)?;

        info!(%rule_id, is_default = rule.is_default, "rule updated");
        Ok(rule)
    }

    async fn delete(&self, actor: UserId, rule_id: RuleId) -> Result<(), Error> {
        self.owned_rule(&actor, &rule_id).await?;
        let removed = self
            .rule_repo
            .delete(&rule_id)
            .await
            .map_err(map_rule_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("rule {rule_id} not found")));
        }

        info!(%rule_id, "rule deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> RuleQuery for RuleService<R>
where
    R: RuleRepository,
{
    async fn list(&self, actor: UserId) -> Result<Vec<Rule>, Error> {
        self.rule_repo
            .list_for_owner(&actor)
            .await
            .map_err(map_rule_repository_error)
    }

    async fn get(&self, actor: UserId, rule_id: RuleId) -> Result<Rule, Error> {
        self.owned_rule(&actor, &rule_id).await
    }
}
