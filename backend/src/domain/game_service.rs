//! Game domain service implementing the game driving ports.
//!
//! Every write resolves the rule, location, and player users it references
//! before anything is persisted, so a stale id surfaces as a validation error
//! rather than a database failure. Scoring happens here, against the rule in
//! effect after the write.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::location_service::map_location_repository_error;
use crate::domain::ports::{
    CreateGameRequest, GameCommand, GameQuery, GameRepository, GameRepositoryError,
    LocationRepository, RuleRepository, UpdateGameRequest, UserRepository, UserRepositoryError,
};
use crate::domain::rule_service::map_rule_repository_error;
use crate::domain::{
    Error, Game, GameDetails, GameId, GameListFilter, LocationId, PlayerLineup, Rule, RuleId,
    UserId,
};

/// Game service implementing [`GameCommand`] and [`GameQuery`].
#[derive(Clone)]
pub struct GameService<G, R, L, U> {
    game_repo: Arc<G>,
    rule_repo: Arc<R>,
    location_repo: Arc<L>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<G, R, L, U> GameService<G, R, L, U> {
    /// Create a new service over the game repository and the repositories
    /// used to resolve references.
    pub fn new(
        game_repo: Arc<G>,
        rule_repo: Arc<R>,
        location_repo: Arc<L>,
        user_repo: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            game_repo,
            rule_repo,
            location_repo,
            user_repo,
            clock,
        }
    }
}

fn map_game_repository_error(error: GameRepositoryError) -> Error {
    match error {
        GameRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("game repository unavailable: {message}"))
        }
        GameRepositoryError::Query { message } => {
            Error::internal(format!("game repository error: {message}"))
        }
        GameRepositoryError::MissingReference { message } => Error::invalid_request(message),
        GameRepositoryError::DuplicatePlayer { message } => Error::invalid_request(message)
            .with_details(json!({ "field": "players", "code": "duplicate_player" })),
    }
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn missing_reference(field: &str, code: &str, value: String, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
        "value": value,
    }))
}

impl<G, R, L, U> GameService<G, R, L, U>
where
    G: GameRepository,
    R: RuleRepository,
    L: LocationRepository,
    U: UserRepository,
{
    async fn resolve_rule(&self, rule_id: &RuleId) -> Result<Rule, Error> {
        self.rule_repo
            .find_by_id(rule_id)
            .await
            .map_err(map_rule_repository_error)?
            .ok_or_else(|| {
                missing_reference(
                    "rule_id",
                    "unknown_rule",
                    rule_id.to_string(),
                    format!("rule {rule_id} does not exist"),
                )
            })
    }

    async fn ensure_location(&self, location_id: &LocationId) -> Result<(), Error> {
        let found = self
            .location_repo
            .find_by_id(location_id)
            .await
            .map_err(map_location_repository_error)?;
        if found.is_none() {
            return Err(missing_reference(
                "location_id",
                "unknown_location",
                location_id.to_string(),
                format!("location {location_id} does not exist"),
            ));
        }
        Ok(())
    }

    async fn ensure_players(&self, lineup: &PlayerLineup) -> Result<(), Error> {
        let wanted = lineup.user_ids();
        let found: HashSet<UserId> = self
            .user_repo
            .find_many(&wanted)
            .await
            .map_err(map_user_repository_error)?
            .iter()
            .map(|user| *user.id())
            .collect();

        match wanted.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(missing_reference(
                "players",
                "unknown_user",
                missing.to_string(),
                format!("user {missing} does not exist"),
            )),
            None => Ok(()),
        }
    }

    async fn load_details(&self, game_id: &GameId) -> Result<Option<GameDetails>, Error> {
        self.game_repo
            .find_details(game_id)
            .await
            .map_err(map_game_repository_error)
    }

    /// Re-read a game that was just written.
    async fn written_details(&self, game_id: &GameId) -> Result<GameDetails, Error> {
        self.load_details(game_id)
            .await?
            .ok_or_else(|| Error::internal(format!("game {game_id} vanished after write")))
    }

    async fn created_game(&self, actor: &UserId, game_id: &GameId) -> Result<Game, Error> {
        let game = self
            .game_repo
            .find_by_id(game_id)
            .await
            .map_err(map_game_repository_error)?
            .ok_or_else(|| Error::not_found(format!("game {game_id} not found")))?;

        if !game.is_created_by(actor) {
            warn!(%actor, %game_id, "game write refused for non-creator");
            return Err(Error::forbidden("only the game creator may modify this game"));
        }
        Ok(game)
    }
}

#[async_trait]
impl<G, R, L, U> GameCommand for GameService<G, R, L, U>
where
    G: GameRepository,
    R: RuleRepository,
    L: LocationRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateGameRequest) -> Result<GameDetails, Error> {
        let CreateGameRequest { actor, draft } = request;
        let rule = self.resolve_rule(&draft.rule_id).await?;
        if let Some(location_id) = draft.location_id.as_ref() {
            self.ensure_location(location_id).await?;
        }
        self.ensure_players(&draft.players).await?;

        let game = Game::record(GameId::random(), actor, draft, &rule.scoring, self.clock.utc());
        self.game_repo
            .create(&game)
            .await
            .map_err(map_game_repository_error)?;

        info!(game_id = %game.id, creator = %actor, rule_id = %game.rule_id, "game recorded");
        self.written_details(&game.id).await
    }

    async fn update(&self, request: UpdateGameRequest) -> Result<GameDetails, Error> {
        let UpdateGameRequest {
            actor,
            game_id,
            patch,
        } = request;
        let mut game = self.created_game(&actor, &game_id).await?;

        let rule_id = patch.rule_id.unwrap_or(game.rule_id);
        let rule = self.resolve_rule(&rule_id).await?;
        if let Some(Some(location_id)) = patch.location_id.as_ref() {
            self.ensure_location(location_id).await?;
        }
        if let Some(lineup) = patch.players.as_ref() {
            self.ensure_players(lineup).await?;
        }

        game.revise(patch, &rule.scoring, self.clock.utc());
        self.game_repo
            .update(&game)
            .await
            .map_err(map_game_repository_error)?;

        info!(%game_id, rule_id = %game.rule_id, "game updated");
        self.written_details(&game_id).await
    }

    async fn delete(&self, actor: UserId, game_id: GameId) -> Result<(), Error> {
        self.created_game(&actor, &game_id).await?;
        let removed = self
            .game_repo
            .delete(&game_id)
            .await
            .map_err(map_game_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("game {game_id} not found")));
        }

        info!(%game_id, "game deleted");
        Ok(())
    }
}

#[async_trait]
impl<G, R, L, U> GameQuery for GameService<G, R, L, U>
where
    G: GameRepository,
    R: RuleRepository,
    L: LocationRepository,
    U: UserRepository,
{
    async fn list_visible(&self, user: UserId) -> Result<Vec<GameDetails>, Error> {
        self.game_repo
            .list_details(GameListFilter::VisibleTo(user))
            .await
            .map_err(map_game_repository_error)
    }

    async fn list_played_by(&self, user: UserId) -> Result<Vec<GameDetails>, Error> {
        self.game_repo
            .list_details(GameListFilter::PlayedBy(user))
            .await
            .map_err(map_game_repository_error)
    }

    async fn get(&self, game_id: GameId) -> Result<GameDetails, Error> {
        self.load_details(&game_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("game {game_id} not found")))
    }
}

#[cfg(test)]
#[path = "game_service_tests.rs"]
mod tests;
