//! Driving port for player statistics and the ranking table.

use async_trait::async_trait;

use crate::domain::{Error, PlayerStatistics, RankingEntry, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsQuery: Send + Sync {
    /// Statistics for every player with at least one game.
    async fn all_players(&self) -> Result<Vec<PlayerStatistics>, Error>;

    /// Statistics for one player, zeroed when they have no games.
    async fn player(&self, user: UserId) -> Result<PlayerStatistics, Error>;

    /// Players with enough games, best average first.
    async fn ranking(&self) -> Result<Vec<RankingEntry>, Error>;
}
