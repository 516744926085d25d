//! Per-player statistics and the ranking table.
//!
//! Both views reduce the same input: one row per game a player took part in,
//! carrying the player, their rank, and their calculated score. Averages are
//! computed exactly and rounded to two places for presentation; ranking
//! compares the exact values.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use super::{SCORE_SCALE, User, UserId};

/// Minimum number of games before a player appears in the ranking.
pub const RANKING_MIN_GAMES: u32 = 3;

/// One player's result in one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScoreRow {
    pub user: User,
    pub rank: i32,
    pub calculated_score: Decimal,
}

/// Aggregate results for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatistics {
    pub user: User,
    pub total_games: u32,
    pub first_place: u32,
    pub second_place: u32,
    pub third_place: u32,
    pub fourth_place: u32,
    pub total_score: Decimal,
    pub average_score: Option<Decimal>,
    pub max_score: Option<Decimal>,
    pub min_score: Option<Decimal>,
}

impl PlayerStatistics {
    fn exact_average(&self) -> Option<Decimal> {
        (self.total_games > 0).then(|| self.total_score / Decimal::from(self.total_games))
    }
}

/// A ranking table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    /// One-based position in the table.
    pub position: u32,
    pub statistics: PlayerStatistics,
}

#[derive(Debug, Default)]
struct Accumulator {
    games: u32,
    places: [u32; 4],
    total: Decimal,
    max: Option<Decimal>,
    min: Option<Decimal>,
}

impl Accumulator {
    fn add(&mut self, rank: i32, score: Decimal) {
        self.games += 1;
        if let Some(slot) = usize::try_from(rank)
            .ok()
            .and_then(|rank| rank.checked_sub(1))
            .and_then(|index| self.places.get_mut(index))
        {
            *slot += 1;
        }
        self.total += score;
        self.max = Some(self.max.map_or(score, |max| max.max(score)));
        self.min = Some(self.min.map_or(score, |min| min.min(score)));
    }

    fn finish(self, user: User) -> PlayerStatistics {
        let [first_place, second_place, third_place, fourth_place] = self.places;
        let average_score = (self.games > 0).then(|| {
            (self.total / Decimal::from(self.games))
                .round_dp_with_strategy(SCORE_SCALE, RoundingStrategy::MidpointAwayFromZero)
        });
        PlayerStatistics {
            user,
            total_games: self.games,
            first_place,
            second_place,
            third_place,
            fourth_place,
            total_score: self.total,
            average_score,
            max_score: self.max,
            min_score: self.min,
        }
    }
}

/// Group rows by player and reduce each group.
///
/// Players appear in the order they are first seen in `rows`.
///
/// # Examples
/// ```
/// use mahjong_ledger::domain::{PlayerScoreRow, User, UserId, aggregate_statistics};
/// use rust_decimal::Decimal;
///
/// let user = User::new(UserId::random(), "Saki");
/// let rows = vec![
///     PlayerScoreRow { user: user.clone(), rank: 1, calculated_score: Decimal::new(4000, 2) },
///     PlayerScoreRow { user, rank: 3, calculated_score: Decimal::new(-1500, 2) },
/// ];
/// let stats = aggregate_statistics(rows);
/// assert_eq!(stats[0].total_games, 2);
/// assert_eq!(stats[0].average_score, Some(Decimal::new(1250, 2)));
/// ```
pub fn aggregate_statistics(
    rows: impl IntoIterator<Item = PlayerScoreRow>,
) -> Vec<PlayerStatistics> {
    let mut order: Vec<User> = Vec::new();
    let mut groups: HashMap<UserId, Accumulator> = HashMap::new();

    for row in rows {
        let accumulator = groups.entry(*row.user.id()).or_insert_with(|| {
            order.push(row.user.clone());
            Accumulator::default()
        });
        accumulator.add(row.rank, row.calculated_score);
    }

    order
        .into_iter()
        .map(|user| {
            let accumulator = groups.remove(user.id()).unwrap_or_default();
            accumulator.finish(user)
        })
        .collect()
}

/// Reduce rows belonging to a single player.
///
/// Returns zero counts and no average when the player has no games.
pub fn summarise_player(
    user: User,
    rows: impl IntoIterator<Item = PlayerScoreRow>,
) -> PlayerStatistics {
    let mut accumulator = Accumulator::default();
    for row in rows.into_iter().filter(|row| row.user.id() == user.id()) {
        accumulator.add(row.rank, row.calculated_score);
    }
    accumulator.finish(user)
}

/// Build the ranking table from per-player statistics.
///
/// Players with fewer than [`RANKING_MIN_GAMES`] games are dropped. The rest
/// are ordered by average score, highest first, then by user id.
pub fn rank_players(statistics: Vec<PlayerStatistics>) -> Vec<RankingEntry> {
    let mut eligible: Vec<(Decimal, PlayerStatistics)> = statistics
        .into_iter()
        .filter(|stats| stats.total_games >= RANKING_MIN_GAMES)
        .filter_map(|stats| stats.exact_average().map(|average| (average, stats)))
        .collect();

    eligible.sort_by(|(left_avg, left), (right_avg, right)| {
        match right_avg.cmp(left_avg) {
            Ordering::Equal => left.user.id().cmp(right.user.id()),
            other => other,
        }
    });

    eligible
        .into_iter()
        .zip(1_u32..)
        .map(|((_, statistics), position)| RankingEntry {
            position,
            statistics,
        })
        .collect()
}
