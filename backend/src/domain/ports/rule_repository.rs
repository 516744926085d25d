//! Port for rule persistence.
//!
//! Writes that set the default flag must clear the owner's other defaults in
//! the same transaction, leaving at most one default rule per owner.

use async_trait::async_trait;

use crate::domain::{Rule, RuleId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rule repository adapters.
    pub enum RuleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "rule repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "rule repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Fetch a rule by id regardless of owner.
    async fn find_by_id(&self, id: &RuleId) -> Result<Option<Rule>, RuleRepositoryError>;

    /// List an owner's rules, default first, then newest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Rule>, RuleRepositoryError>;

    /// Insert a new rule, clearing the owner's other defaults when
    /// `rule.is_default` is set.
    async fn create(&self, rule: &Rule) -> Result<(), RuleRepositoryError>;

    /// Overwrite a stored rule, with the same default handling as
    /// [`RuleRepository::create`].
    async fn update(&self, rule: &Rule) -> Result<(), RuleRepositoryError>;

    /// Delete a rule and, through the schema, its games. Returns whether a
    /// row was removed.
    async fn delete(&self, id: &RuleId) -> Result<bool, RuleRepositoryError>;
}

/// Fixture implementation holding no rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRuleRepository;

#[async_trait]
impl RuleRepository for FixtureRuleRepository {
    async fn find_by_id(&self, _id: &RuleId) -> Result<Option<Rule>, RuleRepositoryError> {
        Ok(None)
    }

    async fn list_for_owner(&self, _owner: &UserId) -> Result<Vec<Rule>, RuleRepositoryError> {
        Ok(Vec::new())
    }

    async fn create(&self, _rule: &Rule) -> Result<(), RuleRepositoryError> {
        Ok(())
    }

    async fn update(&self, _rule: &Rule) -> Result<(), RuleRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &RuleId) -> Result<bool, RuleRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_repository_is_empty() {
        let repo = FixtureRuleRepository;
        let owner = UserId::random();

        assert!(repo.list_for_owner(&owner).await.expect("list").is_empty());
        assert!(repo.find_by_id(&RuleId::random()).await.expect("find").is_none());
        assert!(!repo.delete(&RuleId::random()).await.expect("delete"));
    }

    #[test]
    fn errors_render_context() {
        let err = RuleRepositoryError::connection("refused");
        assert_eq!(err.to_string(), "rule repository connection failed: refused");
    }
}
