//! Statistics computed over PostgreSQL-backed repositories.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mahjong_ledger::domain::ports::{
    GameRepository, RuleRepository, ScoreRepository, StatisticsQuery,
};
use mahjong_ledger::domain::{
    ErrorCode, Game, GameDraft, GameId, PlayerEntry, PlayerLineup, Rule, RuleDraft, RuleId,
    RuleName, ScoringRule, StatisticsService, Uma, UserId,
};
use mahjong_ledger::outbound::persistence::{
    DbPool, DieselGameRepository, DieselRuleRepository, DieselScoreRepository,
    DieselUserRepository, PoolConfig,
};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, reset_database, seed_user};

const TEST_DB: &str = "diesel_statistics_test";

type Statistics = StatisticsService<DieselScoreRepository, DieselUserRepository>;

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    scores: Arc<DieselScoreRepository>,
    statistics: Statistics,
    players: Vec<UserId>,
    bystander: UserId,
}

/// M-League scoring: 30 000 return, uma 30/10/-10/-30, oka 20.
fn m_league(owner: UserId) -> Result<Rule, String> {
    Ok(Rule::from_draft(
        RuleId::random(),
        owner,
        RuleDraft {
            name: RuleName::new("M-League").map_err(|err| err.to_string())?,
            scoring: ScoringRule {
                starting_points: 25_000,
                return_points: 30_000,
                uma: Uma::new([30, 10, -10, -30]),
                oka: 20,
            },
            is_default: true,
        },
        Utc::now(),
    ))
}

/// Record three games where the first player always wins and the last
/// always finishes fourth.
fn record_games(
    runtime: &Runtime,
    pool: &DbPool,
    rule: &Rule,
    players: &[UserId],
) -> Result<(), String> {
    let games = DieselGameRepository::new(pool.clone());
    for round in 0..3 {
        let entries = players
            .iter()
            .zip([45_000, 30_000, 20_000, 5_000])
            .zip(1..)
            .map(|((user, score), rank)| PlayerEntry::new(*user, rank, score))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.to_string())?;
        let game = Game::record(
            GameId::random(),
            players[0],
            GameDraft {
                rule_id: rule.id,
                location_id: None,
                played_at: Utc::now() - Duration::days(round),
                notes: None,
                players: PlayerLineup::new(entries).map_err(|err| err.to_string())?,
            },
            &rule.scoring,
            Utc::now(),
        );
        runtime
            .block_on(games.create(&game))
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database_url = reset_database(&cluster, TEST_DB)?;
    let players = ["Saki", "Nodoka", "Koromo", "Hisa"]
        .into_iter()
        .map(|name| seed_user(&database_url, name))
        .collect::<Result<Vec<_>, _>>()?;
    let bystander = seed_user(&database_url, "Momoko")?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    let rule = m_league(players[0])?;
    runtime
        .block_on(DieselRuleRepository::new(pool.clone()).create(&rule))
        .map_err(|err| err.to_string())?;
    record_games(&runtime, &pool, &rule, &players)?;

    let scores = Arc::new(DieselScoreRepository::new(pool.clone()));
    let statistics = StatisticsService::new(
        scores.clone(),
        Arc::new(DieselUserRepository::new(pool)),
    );

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        scores,
        statistics,
        players,
        bystander,
    })
}

#[fixture]
fn stats_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn score_rows_can_be_restricted_to_one_player(stats_context: Option<TestContext>) {
    let Some(context) = stats_context else {
        eprintln!("SKIP-TEST-CLUSTER: score_rows_can_be_restricted_to_one_player skipped");
        return;
    };

    let all = context
        .runtime
        .block_on(context.scores.player_scores(None))
        .expect("all rows");
    let winner = context
        .runtime
        .block_on(context.scores.player_scores(Some(context.players[0])))
        .expect("winner rows");

    assert_eq!(all.len(), 12);
    assert_eq!(winner.len(), 3);
    assert!(winner.iter().all(|row| row.rank == 1));
    assert!(winner.iter().all(|row| row.calculated_score == dec!(65.00)));
}

#[rstest]
fn player_statistics_sum_calculated_scores(stats_context: Option<TestContext>) {
    let Some(context) = stats_context else {
        eprintln!("SKIP-TEST-CLUSTER: player_statistics_sum_calculated_scores skipped");
        return;
    };

    let stats = context
        .runtime
        .block_on(context.statistics.player(context.players[3]))
        .expect("player statistics");

    assert_eq!(stats.total_games, 3);
    assert_eq!(stats.fourth_place, 3);
    assert_eq!(stats.total_score, dec!(-165.00));
    assert_eq!(stats.average_score, Some(dec!(-55.00)));
    assert_eq!(stats.max_score, Some(dec!(-55.00)));
}

#[rstest]
fn player_without_games_reports_zeroes(stats_context: Option<TestContext>) {
    let Some(context) = stats_context else {
        eprintln!("SKIP-TEST-CLUSTER: player_without_games_reports_zeroes skipped");
        return;
    };

    let stats = context
        .runtime
        .block_on(context.statistics.player(context.bystander))
        .expect("bystander statistics");

    assert_eq!(stats.user.display_name(), "Momoko");
    assert_eq!(stats.total_games, 0);
    assert!(stats.average_score.is_none());
}

#[rstest]
fn unknown_player_is_not_found(stats_context: Option<TestContext>) {
    let Some(context) = stats_context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_player_is_not_found skipped");
        return;
    };

    let err = context
        .runtime
        .block_on(context.statistics.player(UserId::random()))
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
fn ranking_orders_regular_players_by_average(stats_context: Option<TestContext>) {
    let Some(context) = stats_context else {
        eprintln!("SKIP-TEST-CLUSTER: ranking_orders_regular_players_by_average skipped");
        return;
    };

    let ranking = context
        .runtime
        .block_on(context.statistics.ranking())
        .expect("ranking");

    let table: Vec<_> = ranking
        .iter()
        .map(|entry| (entry.position, *entry.statistics.user.id()))
        .collect();
    let expected: Vec<_> = (1..).zip(context.players.iter().copied()).collect();
    assert_eq!(table, expected);
}
