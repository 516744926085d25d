//! Statistics service implementing [`StatisticsQuery`].
//!
//! Reads raw per-game rows through [`ScoreRepository`] and reduces them with
//! the pure functions in [`crate::domain::statistics`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::game_service::map_user_repository_error;
use crate::domain::ports::{ScoreRepository, ScoreRepositoryError, StatisticsQuery, UserRepository};
use crate::domain::{
    Error, PlayerStatistics, RankingEntry, UserId, aggregate_statistics, rank_players,
    summarise_player,
};

#[derive(Clone)]
pub struct StatisticsService<S, U> {
    score_repo: Arc<S>,
    user_repo: Arc<U>,
}

impl<S, U> StatisticsService<S, U> {
    pub fn new(score_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            score_repo,
            user_repo,
        }
    }
}

fn map_score_repository_error(error: ScoreRepositoryError) -> Error {
    match error {
        ScoreRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("score repository unavailable: {message}"))
        }
        ScoreRepositoryError::Query { message } => {
            Error::internal(format!("score repository error: {message}"))
        }
    }
}

#[async_trait]
impl<S, U> StatisticsQuery for StatisticsService<S, U>
where
    S: ScoreRepository,
    U: UserRepository,
{
    async fn all_players(&self) -> Result<Vec<PlayerStatistics>, Error> {
        let rows = self
            .score_repo
            .player_scores(None)
            .await
            .map_err(map_score_repository_error)?;
        Ok(aggregate_statistics(rows))
    }

    async fn player(&self, user: UserId) -> Result<PlayerStatistics, Error> {
        let found = self
            .user_repo
            .find_by_id(&user)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {user} not found")))?;
        let rows = self
            .score_repo
            .player_scores(Some(user))
            .await
            .map_err(map_score_repository_error)?;
        Ok(summarise_player(found, rows))
    }

    async fn ranking(&self) -> Result<Vec<RankingEntry>, Error> {
        self.all_players().await.map(rank_players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockScoreRepository, MockUserRepository};
    use crate::domain::{ErrorCode, PlayerScoreRow, User};
    use rust_decimal_macros::dec;

    fn make_service(
        scores: MockScoreRepository,
        users: MockUserRepository,
    ) -> StatisticsService<MockScoreRepository, MockUserRepository> {
        StatisticsService::new(Arc::new(scores), Arc::new(users))
    }

    fn rows_for(user: &User, ranks: &[(i32, rust_decimal::Decimal)]) -> Vec<PlayerScoreRow> {
        ranks
            .iter()
            .map(|(rank, score)| PlayerScoreRow {
                user: user.clone(),
                rank: *rank,
                calculated_score: *score,
            })
            .collect()
    }

    #[tokio::test]
    async fn player_summary_includes_extremes() {
        let saki = User::new(UserId::random(), "Saki");
        let user_id = *saki.id();
        let rows = rows_for(&saki, &[(1, dec!(40.00)), (4, dec!(-40.00))]);
        let mut scores = MockScoreRepository::new();
        scores
            .expect_player_scores()
            .withf(move |filter| *filter == Some(user_id))
            .return_once(move |_| Ok(rows));
        let mut users = MockUserRepository::new();
        let known = saki.clone();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(known)));

        let stats = make_service(scores, users)
            .player(user_id)
            .await
            .expect("statistics load");

        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.average_score, Some(dec!(0.00)));
        assert_eq!(stats.max_score, Some(dec!(40.00)));
        assert_eq!(stats.min_score, Some(dec!(-40.00)));
    }

    #[tokio::test]
    async fn unknown_player_is_not_found() {
        let mut scores = MockScoreRepository::new();
        scores.expect_player_scores().never();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let error = make_service(scores, users)
            .player(UserId::random())
            .await
            .expect_err("missing user");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn ranking_requires_three_games() {
        let regular = User::new(UserId::random(), "Koromo");
        let newcomer = User::new(UserId::random(), "Yuki");
        let mut rows = rows_for(
            &regular,
            &[(1, dec!(30)), (2, dec!(10)), (3, dec!(-5))],
        );
        rows.extend(rows_for(&newcomer, &[(1, dec!(60))]));
        let mut scores = MockScoreRepository::new();
        scores
            .expect_player_scores()
            .withf(|filter| filter.is_none())
            .return_once(move |_| Ok(rows));

        let ranking = make_service(scores, MockUserRepository::new())
            .ranking()
            .await
            .expect("ranking loads");

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].statistics.user, regular);
    }

    #[tokio::test]
    async fn query_failures_are_internal() {
        let mut scores = MockScoreRepository::new();
        scores
            .expect_player_scores()
            .return_once(|_| Err(ScoreRepositoryError::query("syntax error")));

        let error = make_service(scores, MockUserRepository::new())
            .all_players()
            .await
            .expect_err("query fails");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
