//! PostgreSQL-backed `ScoreRepository` implementation using Diesel ORM.
//!
//! Reads one row per player per game, joined to the player's user, ordered
//! by user then play time so aggregation sees players in a stable order.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;

use crate::domain::ports::{ScoreRepository, ScoreRepositoryError};
use crate::domain::{PlayerScoreRow, User, UserId};

use super::diesel_error_mapping::{classify_diesel_error, pool_error_message};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::{game_players, games, users};

/// Diesel-backed implementation of the [`ScoreRepository`] port.
#[derive(Clone)]
pub struct DieselScoreRepository {
    pool: DbPool,
}

impl DieselScoreRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScoreRepositoryError {
    ScoreRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ScoreRepositoryError {
    classify_diesel_error(error)
        .into_basic(ScoreRepositoryError::query, ScoreRepositoryError::connection)
}

#[async_trait]
impl ScoreRepository for DieselScoreRepository {
    async fn player_scores(
        &self,
        user: Option<UserId>,
    ) -> Result<Vec<PlayerScoreRow>, ScoreRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = game_players::table
            .inner_join(users::table)
            .inner_join(games::table)
            .order_by((
                users::display_name.asc(),
                users::id.asc(),
                games::played_at.asc(),
            ))
            .select((
                UserRow::as_select(),
                game_players::rank,
                game_players::calculated_score,
            ))
            .into_boxed();
        if let Some(user) = user {
            query = query.filter(game_players::user_id.eq(*user.as_uuid()));
        }

        let rows: Vec<(UserRow, i32, Decimal)> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(user, rank, calculated_score)| PlayerScoreRow {
                user: User::from(user),
                rank,
                calculated_score,
            })
            .collect())
    }
}
