//! Player statistics and ranking HTTP handlers.
//!
//! ```text
//! GET /api/v1/scores/statistics
//! GET /api/v1/scores/user/{user_id}
//! GET /api/v1/scores/ranking
//! ```

use actix_web::{get, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PlayerStatistics, RankingEntry, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::games_dto::UserResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const USER_ID: FieldName = FieldName::new("user_id");

fn decimal(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Aggregate results for one player, with the user eagerly attached.
/// Decimals are two-place strings.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlayerStatisticsResponse {
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub total_games: u32,
    pub first_place: u32,
    pub second_place: u32,
    pub third_place: u32,
    pub fourth_place: u32,
    #[schema(example = "42.50")]
    pub total_score: String,
    /// Absent when the player has no games.
    #[schema(example = "14.17")]
    pub average_score: Option<String>,
    pub user: UserResponse,
}

impl From<&PlayerStatistics> for PlayerStatisticsResponse {
    fn from(stats: &PlayerStatistics) -> Self {
        Self {
            user_id: *stats.user.id(),
            total_games: stats.total_games,
            first_place: stats.first_place,
            second_place: stats.second_place,
            third_place: stats.third_place,
            fourth_place: stats.fourth_place,
            total_score: decimal(stats.total_score),
            average_score: stats.average_score.map(decimal),
            user: UserResponse::from(&stats.user),
        }
    }
}

/// Counts and scores for a single player, including best and worst game.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserStatisticsSummary {
    pub total_games: u32,
    pub first_place: u32,
    pub second_place: u32,
    pub third_place: u32,
    pub fourth_place: u32,
    pub total_score: String,
    pub average_score: Option<String>,
    pub max_score: Option<String>,
    pub min_score: Option<String>,
}

/// `{user, statistics}` envelope for one player.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserStatisticsResponse {
    pub user: UserResponse,
    pub statistics: UserStatisticsSummary,
}

impl From<PlayerStatistics> for UserStatisticsResponse {
    fn from(stats: PlayerStatistics) -> Self {
        Self {
            user: UserResponse::from(&stats.user),
            statistics: UserStatisticsSummary {
                total_games: stats.total_games,
                first_place: stats.first_place,
                second_place: stats.second_place,
                third_place: stats.third_place,
                fourth_place: stats.fourth_place,
                total_score: decimal(stats.total_score),
                average_score: stats.average_score.map(decimal),
                max_score: stats.max_score.map(decimal),
                min_score: stats.min_score.map(decimal),
            },
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RankingEntryResponse {
    /// One-based position in the table.
    pub position: u32,
    #[serde(flatten)]
    pub statistics: PlayerStatisticsResponse,
}

impl From<RankingEntry> for RankingEntryResponse {
    fn from(entry: RankingEntry) -> Self {
        Self {
            position: entry.position,
            statistics: PlayerStatisticsResponse::from(&entry.statistics),
        }
    }
}

/// Aggregates for every player with at least one game.
#[utoipa::path(
    get,
    path = "/api/v1/scores/statistics",
    responses(
        (status = 200, description = "Per-player aggregates", body = [PlayerStatisticsResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["scores"],
    operation_id = "listStatistics"
)]
#[get("/scores/statistics")]
pub async fn all_statistics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PlayerStatisticsResponse>>> {
    session.require_user_id()?;
    let stats = state.statistics.all_players().await?;
    Ok(web::Json(
        stats.iter().map(PlayerStatisticsResponse::from).collect(),
    ))
}

/// One player's aggregate, zeroed when they have not played yet.
#[utoipa::path(
    get,
    path = "/api/v1/scores/user/{user_id}",
    params(("user_id" = String, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Player aggregate", body = UserStatisticsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["scores"],
    operation_id = "getUserStatistics"
)]
#[get("/scores/user/{user_id}")]
pub async fn user_statistics(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserStatisticsResponse>> {
    session.require_user_id()?;
    let user = parse_id(&path, USER_ID)?;
    let stats = state.statistics.player(user).await?;
    Ok(web::Json(UserStatisticsResponse::from(stats)))
}

/// Ranking of players with at least three games by average score.
#[utoipa::path(
    get,
    path = "/api/v1/scores/ranking",
    responses(
        (status = 200, description = "Ranking table", body = [RankingEntryResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["scores"],
    operation_id = "getRanking"
)]
#[get("/scores/ranking")]
pub async fn ranking(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RankingEntryResponse>>> {
    session.require_user_id()?;
    let entries = state.statistics.ranking().await?;
    Ok(web::Json(
        entries.into_iter().map(RankingEntryResponse::from).collect(),
    ))
}
