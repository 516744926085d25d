//! Game DTOs and parsing helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, GameDetails, GameDraft, GameId, GamePatch, GamePlayerId, GameValidationError,
    LocationId, PlayerEntry, PlayerLineup, RuleId, User, UserId,
};
use crate::inbound::http::locations::LocationResponse;
use crate::inbound::http::rules::RuleResponse;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, invalid_item_error, missing_field_error,
    missing_item_field_error, parse_id, parse_optional_id, parse_timestamp,
};

const RULE_ID: FieldName = FieldName::new("rule_id");
const LOCATION_ID: FieldName = FieldName::new("location_id");
const PLAYED_AT: FieldName = FieldName::new("played_at");
const PLAYERS: FieldName = FieldName::new("players");

/// One player's raw result.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PlayerRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: Option<String>,
    #[schema(example = 1, minimum = 1, maximum = 4)]
    pub rank: Option<i32>,
    /// Raw table score.
    #[schema(example = 45000)]
    pub score: Option<i32>,
}

/// Payload for recording a game.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateGamePayload {
    pub rule_id: Option<String>,
    pub location_id: Option<String>,
    /// RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]` read as UTC.
    #[schema(example = "2024-05-01T19:30")]
    pub played_at: Option<String>,
    pub notes: Option<String>,
    /// Exactly four entries.
    pub players: Option<Vec<PlayerRequest>>,
}

/// Partial update of a game.
///
/// `location_id` and `notes` may be set to `null` to clear them. Supplied
/// `players` replace the stored four.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateGamePayload {
    pub rule_id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub location_id: Option<Option<String>>,
    pub played_at: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    pub players: Option<Vec<PlayerRequest>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            name: user.display_name().to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GamePlayerResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: GamePlayerId,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub rank: i32,
    pub score: i32,
    /// Two-place decimal derived from the game's rule.
    #[schema(example = "55.00")]
    pub calculated_score: String,
    pub user: Option<UserResponse>,
}

/// Game with its rule, location, creator, and scored players.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GameResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: GameId,
    #[schema(value_type = String, format = Uuid)]
    pub rule_id: RuleId,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub location_id: Option<LocationId>,
    /// The user who recorded the game.
    #[schema(value_type = String, format = Uuid)]
    pub created_by: UserId,
    pub played_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rule: RuleResponse,
    pub location: Option<LocationResponse>,
    pub creator: UserResponse,
    /// Ordered by rank.
    pub players: Vec<GamePlayerResponse>,
}

impl From<GameDetails> for GameResponse {
    fn from(details: GameDetails) -> Self {
        let players = details
            .game
            .players
            .iter()
            .map(|player| GamePlayerResponse {
                id: player.id,
                user_id: player.user_id,
                rank: player.rank.get(),
                score: player.score,
                calculated_score: format!("{:.2}", player.calculated_score),
                user: details.user(&player.user_id).map(UserResponse::from),
            })
            .collect();
        let GameDetails {
            game,
            rule,
            location,
            creator,
            ..
        } = details;

        Self {
            id: game.id,
            rule_id: game.rule_id,
            location_id: game.location_id,
            created_by: game.creator,
            played_at: game.played_at,
            notes: game.notes,
            created_at: game.created_at,
            updated_at: game.updated_at,
            rule: RuleResponse::from(rule),
            location: location.map(LocationResponse::from),
            creator: UserResponse::from(&creator),
            players,
        }
    }
}

fn parse_entry(index: usize, player: PlayerRequest) -> Result<PlayerEntry, Error> {
    let raw_user = player
        .user_id
        .ok_or_else(|| missing_item_field_error(PLAYERS, index, "user_id"))?;
    let rank = player
        .rank
        .ok_or_else(|| missing_item_field_error(PLAYERS, index, "rank"))?;
    let score = player
        .score
        .ok_or_else(|| missing_item_field_error(PLAYERS, index, "score"))?;
    let user_id: UserId = raw_user.parse().map_err(|_| {
        invalid_item_error(
            PLAYERS,
            index,
            "invalid_uuid",
            format!("players[{index}].user_id must be a valid UUID"),
        )
    })?;
    PlayerEntry::new(user_id, rank, score)
        .map_err(|err| invalid_item_error(PLAYERS, index, "rank_out_of_range", err.to_string()))
}

fn lineup_error(err: GameValidationError) -> Error {
    let code = match err {
        GameValidationError::WrongPlayerCount { .. } => "player_count",
        GameValidationError::RankOutOfRange(_) => "rank_out_of_range",
        GameValidationError::DuplicateRank { .. } => "duplicate_rank",
        GameValidationError::DuplicateUser { .. } => "duplicate_player",
    };
    invalid_field_error(PLAYERS, code, err.to_string())
}

/// Validate four player entries into a lineup.
pub(super) fn parse_lineup(players: Vec<PlayerRequest>) -> Result<PlayerLineup, Error> {
    let entries = players
        .into_iter()
        .enumerate()
        .map(|(index, player)| parse_entry(index, player))
        .collect::<Result<Vec<_>, _>>()?;
    PlayerLineup::new(entries).map_err(lineup_error)
}

pub(super) fn parse_create(payload: CreateGamePayload) -> Result<GameDraft, Error> {
    let rule_id = payload.rule_id.ok_or_else(|| missing_field_error(RULE_ID))?;
    let played_at = payload
        .played_at
        .ok_or_else(|| missing_field_error(PLAYED_AT))?;
    let players = payload.players.ok_or_else(|| missing_field_error(PLAYERS))?;

    Ok(GameDraft {
        rule_id: parse_id(&rule_id, RULE_ID)?,
        location_id: parse_optional_id(payload.location_id.as_deref(), LOCATION_ID)?,
        played_at: parse_timestamp(&played_at, PLAYED_AT)?,
        notes: payload.notes,
        players: parse_lineup(players)?,
    })
}

pub(super) fn parse_update(payload: UpdateGamePayload) -> Result<GamePatch, Error> {
    let location_id = match payload.location_id {
        Some(raw) => Some(parse_optional_id(raw.as_deref(), LOCATION_ID)?),
        None => None,
    };
    Ok(GamePatch {
        rule_id: parse_optional_id(payload.rule_id.as_deref(), RULE_ID)?,
        location_id,
        played_at: payload
            .played_at
            .map(|raw| parse_timestamp(&raw, PLAYED_AT))
            .transpose()?,
        notes: payload.notes,
        players: payload.players.map(parse_lineup).transpose()?,
    })
}
