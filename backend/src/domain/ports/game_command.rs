//! Driving port for recording and editing games.

use async_trait::async_trait;

use crate::domain::{Error, GameDetails, GameDraft, GameId, GamePatch, UserId};

/// Request to record a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGameRequest {
    pub actor: UserId,
    pub draft: GameDraft,
}

/// Request to edit a game the actor created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGameRequest {
    pub actor: UserId,
    pub game_id: GameId,
    pub patch: GamePatch,
}

/// Driving port for game writes.
///
/// Implementations validate every referenced rule, location and user before
/// writing, and persist a game together with its players atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameCommand: Send + Sync {
    /// # Errors
    ///
    /// `invalid_request` when a referenced record is missing.
    async fn create(&self, request: CreateGameRequest) -> Result<GameDetails, Error>;

    /// # Errors
    ///
    /// `not_found` for an unknown game, `forbidden` when the actor did not
    /// create it, `invalid_request` for missing references.
    async fn update(&self, request: UpdateGameRequest) -> Result<GameDetails, Error>;

    async fn delete(&self, actor: UserId, game_id: GameId) -> Result<(), Error>;
}
