//! Port for reading per-player game results for statistics.

use async_trait::async_trait;

use crate::domain::{PlayerScoreRow, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by score repository adapters.
    pub enum ScoreRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "score repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "score repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Load one row per player per game, restricted to `user` when given.
    async fn player_scores(
        &self,
        user: Option<UserId>,
    ) -> Result<Vec<PlayerScoreRow>, ScoreRepositoryError>;
}

/// Fixture implementation with no recorded games.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureScoreRepository;

#[async_trait]
impl ScoreRepository for FixtureScoreRepository {
    async fn player_scores(
        &self,
        _user: Option<UserId>,
    ) -> Result<Vec<PlayerScoreRow>, ScoreRepositoryError> {
        Ok(Vec::new())
    }
}
