//! Driving port for reading games.

use async_trait::async_trait;

use crate::domain::{Error, GameDetails, GameId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameQuery: Send + Sync {
    /// Games the user created or played in, most recent first.
    async fn list_visible(&self, user: UserId) -> Result<Vec<GameDetails>, Error>;

    /// Games the user played in, most recent first.
    async fn list_played_by(&self, user: UserId) -> Result<Vec<GameDetails>, Error>;

    async fn get(&self, game_id: GameId) -> Result<GameDetails, Error>;
}
