//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations, plus the conversions back
//! into validated domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    GameId, GamePlayer, GamePlayerId, Location, LocationId, LocationName, Rank, Rule, RuleId,
    RuleName, ScoringRule, Uma, User, UserId,
};

use super::schema::{game_players, games, locations, rules, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::from_uuid(row.id), row.display_name)
    }
}

// ---------------------------------------------------------------------------
// Rule models
// ---------------------------------------------------------------------------

/// Row struct for reading from the rules table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RuleRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub starting_points: i32,
    pub return_points: i32,
    pub uma_1: i32,
    pub uma_2: i32,
    pub uma_3: i32,
    pub uma_4: i32,
    pub oka: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating rule records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rules)]
pub(crate) struct NewRuleRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub starting_points: i32,
    pub return_points: i32,
    pub uma_1: i32,
    pub uma_2: i32,
    pub uma_3: i32,
    pub uma_4: i32,
    pub oka: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Rule> for NewRuleRow<'a> {
    fn from(rule: &'a Rule) -> Self {
        let [uma_1, uma_2, uma_3, uma_4] = rule.scoring.uma.values();
        Self {
            id: *rule.id.as_uuid(),
            user_id: *rule.owner.as_uuid(),
            name: rule.name.as_ref(),
            starting_points: rule.scoring.starting_points,
            return_points: rule.scoring.return_points,
            uma_1,
            uma_2,
            uma_3,
            uma_4,
            oka: rule.scoring.oka,
            is_default: rule.is_default,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

/// Changeset struct for updating rule records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = rules)]
pub(crate) struct RuleChanges<'a> {
    pub name: &'a str,
    pub starting_points: i32,
    pub return_points: i32,
    pub uma_1: i32,
    pub uma_2: i32,
    pub uma_3: i32,
    pub uma_4: i32,
    pub oka: i32,
    pub is_default: bool,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Rule> for RuleChanges<'a> {
    fn from(rule: &'a Rule) -> Self {
        let [uma_1, uma_2, uma_3, uma_4] = rule.scoring.uma.values();
        Self {
            name: rule.name.as_ref(),
            starting_points: rule.scoring.starting_points,
            return_points: rule.scoring.return_points,
            uma_1,
            uma_2,
            uma_3,
            uma_4,
            oka: rule.scoring.oka,
            is_default: rule.is_default,
            updated_at: rule.updated_at,
        }
    }
}

/// Convert a database row to a domain rule.
pub(crate) fn row_to_rule(row: RuleRow) -> Result<Rule, String> {
    let name = RuleName::new(row.name)
        .map_err(|err| format!("invalid rule name for rule {}: {err}", row.id))?;
    Ok(Rule {
        id: RuleId::from_uuid(row.id),
        owner: UserId::from_uuid(row.user_id),
        name,
        scoring: ScoringRule {
            starting_points: row.starting_points,
            return_points: row.return_points,
            uma: Uma::new([row.uma_1, row.uma_2, row.uma_3, row.uma_4]),
            oka: row.oka,
        },
        is_default: row.is_default,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

// ---------------------------------------------------------------------------
// Location models
// ---------------------------------------------------------------------------

/// Row struct for reading from the locations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating location records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = locations)]
pub(crate) struct NewLocationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Location> for NewLocationRow<'a> {
    fn from(location: &'a Location) -> Self {
        Self {
            id: *location.id.as_uuid(),
            user_id: *location.owner.as_uuid(),
            name: location.name.as_ref(),
            address: location.address.as_deref(),
            notes: location.notes.as_deref(),
            created_at: location.created_at,
            updated_at: location.updated_at,
        }
    }
}

/// Changeset for location updates. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = locations)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct LocationChanges<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Location> for LocationChanges<'a> {
    fn from(location: &'a Location) -> Self {
        Self {
            name: location.name.as_ref(),
            address: location.address.as_deref(),
            notes: location.notes.as_deref(),
            updated_at: location.updated_at,
        }
    }
}

/// Convert a database row to a domain location.
pub(crate) fn row_to_location(row: LocationRow) -> Result<Location, String> {
    let name = LocationName::new(row.name)
        .map_err(|err| format!("invalid location name for location {}: {err}", row.id))?;
    Ok(Location {
        id: LocationId::from_uuid(row.id),
        owner: UserId::from_uuid(row.user_id),
        name,
        address: row.address,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

// ---------------------------------------------------------------------------
// Game models
// ---------------------------------------------------------------------------

/// Row struct for reading from the games table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameRow {
    pub id: Uuid,
    pub rule_id: Uuid,
    pub location_id: Option<Uuid>,
    pub creator_id: Uuid,
    pub played_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating game records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = games)]
pub(crate) struct NewGameRow<'a> {
    pub id: Uuid,
    pub rule_id: Uuid,
    pub location_id: Option<Uuid>,
    pub creator_id: Uuid,
    pub played_at: DateTime<Utc>,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for game updates. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = games)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct GameChanges<'a> {
    pub rule_id: Uuid,
    pub location_id: Option<Uuid>,
    pub played_at: DateTime<Utc>,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the game_players table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = game_players)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GamePlayerRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub rank: i32,
    pub score: i32,
    pub calculated_score: Decimal,
}

/// Insertable struct for creating game player records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = game_players)]
pub(crate) struct NewGamePlayerRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub rank: i32,
    pub score: i32,
    pub calculated_score: Decimal,
}

impl NewGamePlayerRow {
    pub(crate) fn for_game(game_id: &GameId, player: &GamePlayer) -> Self {
        Self {
            id: *player.id.as_uuid(),
            game_id: *game_id.as_uuid(),
            user_id: *player.user_id.as_uuid(),
            rank: player.rank.get(),
            score: player.score,
            calculated_score: player.calculated_score,
        }
    }
}

/// Convert a database row to a domain game player.
pub(crate) fn row_to_game_player(row: GamePlayerRow) -> Result<GamePlayer, String> {
    let rank = Rank::new(row.rank)
        .map_err(|err| format!("invalid rank for game player {}: {err}", row.id))?;
    Ok(GamePlayer {
        id: GamePlayerId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        rank,
        score: row.score,
        calculated_score: row.calculated_score,
    })
}
