//! Port for game persistence.
//!
//! A game and its four player rows are written as a unit: adapters must run
//! each write in a single transaction so a failure leaves no partial game.

use async_trait::async_trait;

use crate::domain::{Game, GameDetails, GameId, GameListFilter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by game repository adapters.
    pub enum GameRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "game repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "game repository query failed: {message}",
        /// A referenced rule, location or user no longer exists.
        MissingReference { message: String } =>
            "game references a missing record: {message}",
        /// A player constraint (unique user or rank per game) was violated.
        DuplicatePlayer { message: String } =>
            "game players conflict: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Fetch a game with its players.
    async fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, GameRepositoryError>;

    /// Fetch a game with rule, location, creator and player users loaded.
    async fn find_details(&self, id: &GameId)
    -> Result<Option<GameDetails>, GameRepositoryError>;

    /// List games matching `filter`, most recently played first, with
    /// related records loaded.
    async fn list_details(
        &self,
        filter: GameListFilter,
    ) -> Result<Vec<GameDetails>, GameRepositoryError>;

    /// Insert the game row and its players atomically.
    async fn create(&self, game: &Game) -> Result<(), GameRepositoryError>;

    /// Overwrite the game row and replace every player row atomically.
    async fn update(&self, game: &Game) -> Result<(), GameRepositoryError>;

    /// Delete a game and its players. Returns whether a row was removed.
    async fn delete(&self, id: &GameId) -> Result<bool, GameRepositoryError>;
}

/// Fixture implementation holding no games.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGameRepository;

#[async_trait]
impl GameRepository for FixtureGameRepository {
    async fn find_by_id(&self, _id: &GameId) -> Result<Option<Game>, GameRepositoryError> {
        Ok(None)
    }

    async fn find_details(
        &self,
        _id: &GameId,
    ) -> Result<Option<GameDetails>, GameRepositoryError> {
        Ok(None)
    }

    async fn list_details(
        &self,
        _filter: GameListFilter,
    ) -> Result<Vec<GameDetails>, GameRepositoryError> {
        Ok(Vec::new())
    }

    async fn create(&self, _game: &Game) -> Result<(), GameRepositoryError> {
        Ok(())
    }

    async fn update(&self, _game: &Game) -> Result<(), GameRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &GameId) -> Result<bool, GameRepositoryError> {
        Ok(false)
    }
}
