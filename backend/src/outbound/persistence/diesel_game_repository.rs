//! PostgreSQL-backed `GameRepository` implementation using Diesel ORM.
//!
//! A game row and its four player rows are always written in one
//! transaction. Updates delete and reinsert the player rows. Detail reads
//! load games first, then batch-load players, rules, locations, and users
//! for the whole page with one query per table.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{GameRepository, GameRepositoryError};
use crate::domain::{
    Game, GameDetails, GameId, GameListFilter, GamePlayer, Location, LocationId, Rule, RuleId,
    User, UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{
    GameChanges, GamePlayerRow, GameRow, LocationRow, NewGamePlayerRow, NewGameRow, RuleRow,
    UserRow, row_to_game_player, row_to_location, row_to_rule,
};
use super::pool::{DbPool, PoolError};
use super::schema::{game_players, games, locations, rules, users};

/// Diesel-backed implementation of the [`GameRepository`] port.
#[derive(Clone)]
pub struct DieselGameRepository {
    pool: DbPool,
}

impl DieselGameRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GameRepositoryError {
    GameRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> GameRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::ForeignKey { constraint } => GameRepositoryError::missing_reference(
            constraint.map_or_else(
                || "a referenced record does not exist".to_owned(),
                |name| format!("constraint {name} failed"),
            ),
        ),
        DieselFailure::Unique { constraint } => GameRepositoryError::duplicate_player(
            match constraint.as_deref() {
                Some("game_players_game_rank_key") => "a rank is assigned twice",
                Some("game_players_game_user_key") => "a user is seated twice",
                _ => "a game player constraint was violated",
            },
        ),
        other => other.into_basic(GameRepositoryError::query, GameRepositoryError::connection),
    }
}

/// Player rows for `game`, in seat order.
fn player_rows(game: &Game) -> Vec<NewGamePlayerRow> {
    game.players
        .iter()
        .map(|player| NewGamePlayerRow::for_game(&game.id, player))
        .collect()
}

async fn load_players(
    conn: &mut AsyncPgConnection,
    game_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<GamePlayer>>, GameRepositoryError> {
    let rows: Vec<GamePlayerRow> = game_players::table
        .filter(game_players::game_id.eq_any(game_ids))
        .order_by((game_players::game_id, game_players::rank))
        .select(GamePlayerRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut grouped: HashMap<Uuid, Vec<GamePlayer>> = HashMap::new();
    for row in rows {
        let game_id = row.game_id;
        let player = row_to_game_player(row).map_err(GameRepositoryError::query)?;
        grouped.entry(game_id).or_default().push(player);
    }
    Ok(grouped)
}

fn row_to_game(row: GameRow, players: Vec<GamePlayer>) -> Game {
    Game {
        id: GameId::from_uuid(row.id),
        rule_id: RuleId::from_uuid(row.rule_id),
        location_id: row.location_id.map(LocationId::from_uuid),
        creator: UserId::from_uuid(row.creator_id),
        played_at: row.played_at,
        notes: row.notes,
        players,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Attach players to game rows.
async fn hydrate_games(
    conn: &mut AsyncPgConnection,
    rows: Vec<GameRow>,
) -> Result<Vec<Game>, GameRepositoryError> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut players = load_players(conn, &ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let seats = players.remove(&row.id).unwrap_or_default();
            row_to_game(row, seats)
        })
        .collect())
}

/// Load related rules, locations, and users for `games` and assemble details.
async fn load_details(
    conn: &mut AsyncPgConnection,
    games: Vec<Game>,
) -> Result<Vec<GameDetails>, GameRepositoryError> {
    let rule_ids: Vec<Uuid> = games.iter().map(|game| *game.rule_id.as_uuid()).collect();
    let location_ids: Vec<Uuid> = games
        .iter()
        .filter_map(|game| game.location_id.map(|id| *id.as_uuid()))
        .collect();
    let user_ids: Vec<Uuid> = games
        .iter()
        .flat_map(|game| {
            std::iter::once(*game.creator.as_uuid())
                .chain(game.players.iter().map(|player| *player.user_id.as_uuid()))
        })
        .collect();

    let rule_rows: Vec<RuleRow> = rules::table
        .filter(rules::id.eq_any(&rule_ids))
        .select(RuleRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let location_rows: Vec<LocationRow> = locations::table
        .filter(locations::id.eq_any(&location_ids))
        .select(LocationRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let user_rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(&user_ids))
        .select(UserRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let rules_by_id: HashMap<RuleId, Rule> = rule_rows
        .into_iter()
        .map(|row| row_to_rule(row).map(|rule| (rule.id, rule)))
        .collect::<Result<_, _>>()
        .map_err(GameRepositoryError::query)?;
    let locations_by_id: HashMap<LocationId, Location> = location_rows
        .into_iter()
        .map(|row| row_to_location(row).map(|location| (location.id, location)))
        .collect::<Result<_, _>>()
        .map_err(GameRepositoryError::query)?;
    let users_by_id: HashMap<UserId, User> = user_rows
        .into_iter()
        .map(|row| {
            let user = User::from(row);
            (*user.id(), user)
        })
        .collect();

    games
        .into_iter()
        .map(|game| {
            let rule = rules_by_id.get(&game.rule_id).cloned().ok_or_else(|| {
                GameRepositoryError::query(format!("rule missing for game {}", game.id))
            })?;
            let location = game
                .location_id
                .and_then(|id| locations_by_id.get(&id).cloned());
            let creator = users_by_id.get(&game.creator).cloned().ok_or_else(|| {
                GameRepositoryError::query(format!("creator missing for game {}", game.id))
            })?;
            let users = game
                .players
                .iter()
                .filter_map(|player| users_by_id.get(&player.user_id).cloned())
                .collect();
            Ok(GameDetails {
                game,
                rule,
                location,
                creator,
                users,
            })
        })
        .collect()
}

async fn find_game(
    conn: &mut AsyncPgConnection,
    id: &GameId,
) -> Result<Option<Game>, GameRepositoryError> {
    let row: Option<GameRow> = games::table
        .filter(games::id.eq(id.as_uuid()))
        .select(GameRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    match row {
        Some(row) => Ok(hydrate_games(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl GameRepository for DieselGameRepository {
    async fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        find_game(&mut conn, id).await
    }

    async fn find_details(
        &self,
        id: &GameId,
    ) -> Result<Option<GameDetails>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(game) = find_game(&mut conn, id).await? else {
            return Ok(None);
        };
        Ok(load_details(&mut conn, vec![game]).await?.pop())
    }

    async fn list_details(
        &self,
        filter: GameListFilter,
    ) -> Result<Vec<GameDetails>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = games::table
            .select(GameRow::as_select())
            .order_by((games::played_at.desc(), games::created_at.desc()))
            .into_boxed();
        query = match filter {
            GameListFilter::VisibleTo(user) => {
                let user = *user.as_uuid();
                query.filter(
                    games::creator_id.eq(user).or(games::id.eq_any(
                        game_players::table
                            .filter(game_players::user_id.eq(user))
                            .select(game_players::game_id),
                    )),
                )
            }
            GameListFilter::PlayedBy(user) => query.filter(
                games::id.eq_any(
                    game_players::table
                        .filter(game_players::user_id.eq(*user.as_uuid()))
                        .select(game_players::game_id),
                ),
            ),
        };

        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        let games = hydrate_games(&mut conn, rows).await?;
        load_details(&mut conn, games).await
    }

    async fn create(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewGameRow {
            id: *game.id.as_uuid(),
            rule_id: *game.rule_id.as_uuid(),
            location_id: game.location_id.map(|id| *id.as_uuid()),
            creator_id: *game.creator.as_uuid(),
            played_at: game.played_at,
            notes: game.notes.as_deref(),
            created_at: game.created_at,
            updated_at: game.updated_at,
        };
        let players = player_rows(game);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(games::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(game_players::table)
                    .values(&players)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let game_id = *game.id.as_uuid();
        let changes = GameChanges {
            rule_id: *game.rule_id.as_uuid(),
            location_id: game.location_id.map(|id| *id.as_uuid()),
            played_at: game.played_at,
            notes: game.notes.as_deref(),
            updated_at: game.updated_at,
        };
        let players = player_rows(game);

        let updated = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(games::table.filter(games::id.eq(game_id)))
                        .set(&changes)
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        return Ok(false);
                    }
                    diesel::delete(game_players::table.filter(game_players::game_id.eq(game_id)))
                        .execute(conn)
                        .await?;
                    diesel::insert_into(game_players::table)
                        .values(&players)
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if !updated {
            return Err(GameRepositoryError::query("game not found for update"));
        }
        Ok(())
    }

    async fn delete(&self, id: &GameId) -> Result<bool, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(games::table.filter(games::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct ConstraintInfo(Option<&'static str>);

    impl DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "constraint violated"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("game_players")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(ConstraintInfo(constraint)))
    }

    #[rstest]
    #[case(Some("game_players_game_rank_key"), "a rank is assigned twice")]
    #[case(Some("game_players_game_user_key"), "a user is seated twice")]
    #[case(None, "a game player constraint was violated")]
    fn unique_violations_map_to_duplicate_player(
        #[case] constraint: Option<&'static str>,
        #[case] message: &str,
    ) {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation, constraint));
        assert_eq!(mapped, GameRepositoryError::duplicate_player(message));
    }

    #[test]
    fn foreign_key_violations_map_to_missing_reference() {
        let mapped = map_diesel_error(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            Some("games_rule_id_fkey"),
        ));
        assert_eq!(
            mapped,
            GameRepositoryError::missing_reference("constraint games_rule_id_fkey failed")
        );
    }

    #[test]
    fn closed_connections_map_to_connection_errors() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert_eq!(mapped, GameRepositoryError::connection("database connection error"));
    }
}
