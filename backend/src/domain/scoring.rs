//! Score calculation for finished games.
//!
//! A player's calculated score is their raw table score relative to the
//! rule's return points, scaled to thousands, plus the uma for their final
//! rank and, for first place only, the oka:
//!
//! ```text
//! (raw - return_points) / 1000 + uma[rank] + (rank == 1 ? oka : 0)
//! ```
//!
//! The result is exact decimal arithmetic rounded to two places. Nothing here
//! forces a game's scores to sum to zero; that depends on how the rule author
//! balances uma and oka.

use rust_decimal::{Decimal, RoundingStrategy};

/// Default starting points for a new rule.
pub const DEFAULT_STARTING_POINTS: i32 = 25_000;
/// Default return points for a new rule.
pub const DEFAULT_RETURN_POINTS: i32 = 30_000;
/// Default uma for ranks one to four.
pub const DEFAULT_UMA: [i32; 4] = [20, 10, -10, -20];
/// Default oka.
pub const DEFAULT_OKA: i32 = 0;

/// Fractional digits kept for stored scores.
pub const SCORE_SCALE: u32 = 2;

/// Raw points per scoring unit.
const POINTS_PER_UNIT_SCALE: u32 = 3;

/// Final placing of a player within a four-player game.
///
/// # Examples
/// ```
/// use mahjong_ledger::domain::Rank;
///
/// assert!(Rank::new(1).is_ok());
/// assert!(Rank::new(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

/// Error returned when a rank lies outside `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rank must be between 1 and 4, got {value}")]
pub struct RankOutOfRange {
    /// The rejected rank.
    pub value: i32,
}

impl Rank {
    /// All ranks in placing order.
    pub const ALL: [Rank; 4] = [Rank(1), Rank(2), Rank(3), Rank(4)];

    /// Validate a rank.
    pub fn new(value: i32) -> Result<Self, RankOutOfRange> {
        match value {
            1..=4 => u8::try_from(value)
                .map(Self)
                .map_err(|_| RankOutOfRange { value }),
            _ => Err(RankOutOfRange { value }),
        }
    }

    /// Numeric rank in `1..=4`.
    #[must_use]
    pub fn get(self) -> i32 {
        i32::from(self.0)
    }
}

/// Per-rank bonus/penalty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uma([i32; 4]);

impl Uma {
    /// Build a table from the first- to fourth-place values, in thousands.
    #[must_use]
    pub const fn new(values: [i32; 4]) -> Self {
        Self(values)
    }

    /// Uma for the given rank; ranks outside `1..=4` receive nothing.
    #[must_use]
    pub fn for_rank(&self, rank: i32) -> i32 {
        usize::try_from(rank)
            .ok()
            .and_then(|rank| rank.checked_sub(1))
            .and_then(|index| self.0.get(index).copied())
            .unwrap_or(0)
    }

    /// Values ordered first to fourth place.
    #[must_use]
    pub fn values(&self) -> [i32; 4] {
        self.0
    }
}

impl Default for Uma {
    fn default() -> Self {
        Self(DEFAULT_UMA)
    }
}

/// Point parameters of a rule.
///
/// `starting_points` is informational; the calculation only reads
/// `return_points`, `uma` and `oka`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRule {
    pub starting_points: i32,
    pub return_points: i32,
    pub uma: Uma,
    pub oka: i32,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            starting_points: DEFAULT_STARTING_POINTS,
            return_points: DEFAULT_RETURN_POINTS,
            uma: Uma::default(),
            oka: DEFAULT_OKA,
        }
    }
}

impl ScoringRule {
    /// Calculate a player's score for the given rank and raw table score.
    ///
    /// The function is total: a rank outside `1..=4` contributes neither uma
    /// nor oka. Callers that persist scores validate ranks with [`Rank`].
    ///
    /// # Examples
    /// ```
    /// use mahjong_ledger::domain::{ScoringRule, Uma};
    /// use rust_decimal::Decimal;
    ///
    /// let rule = ScoringRule {
    ///     starting_points: 25_000,
    ///     return_points: 30_000,
    ///     uma: Uma::new([20, 10, -10, -20]),
    ///     oka: 10,
    /// };
    /// assert_eq!(rule.calculate(1, 40_000), Decimal::new(4000, 2));
    /// ```
    #[must_use]
    pub fn calculate(&self, rank: i32, raw_score: i32) -> Decimal {
        let relative = i64::from(raw_score) - i64::from(self.return_points);
        let oka = if rank == 1 { self.oka } else { 0 };
        let score = Decimal::new(relative, POINTS_PER_UNIT_SCALE)
            + Decimal::from(self.uma.for_rank(rank))
            + Decimal::from(oka);
        score.round_dp_with_strategy(SCORE_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn rule_with_oka() -> ScoringRule {
        ScoringRule {
            starting_points: 25_000,
            return_points: 30_000,
            uma: Uma::new([20, 10, -10, -20]),
            oka: 10,
        }
    }

    #[rstest]
    #[case(1, 40_000, dec!(40.00))]
    #[case(4, 10_000, dec!(-40.00))]
    #[case(2, 30_000, dec!(10.00))]
    #[case(3, 25_500, dec!(-14.50))]
    fn calculates_documented_examples(
        rule_with_oka: ScoringRule,
        #[case] rank: i32,
        #[case] raw: i32,
        #[case] expected: Decimal,
    ) {
        assert_eq!(rule_with_oka.calculate(rank, raw), expected);
    }

    #[rstest]
    fn division_is_exact_and_rounded_to_two_places(rule_with_oka: ScoringRule) {
        // -7.655 rounds away from zero.
        assert_eq!(rule_with_oka.calculate(2, 12_345), dec!(-7.66));
        assert_eq!(rule_with_oka.calculate(2, 30_001), dec!(10.00));
        assert_eq!(rule_with_oka.calculate(2, 30_005), dec!(10.01));
    }

    #[rstest]
    fn oka_applies_to_first_place_only(rule_with_oka: ScoringRule) {
        let first = rule_with_oka.calculate(1, 30_000);
        let second = rule_with_oka.calculate(2, 30_000);
        assert_eq!(first - second, dec!(20));
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(-1)]
    fn rank_outside_range_earns_no_uma_or_oka(rule_with_oka: ScoringRule, #[case] rank: i32) {
        assert_eq!(rule_with_oka.calculate(rank, 40_000), dec!(10.00));
    }

    #[test]
    fn scores_need_not_sum_to_zero() {
        let rule = ScoringRule {
            oka: 20,
            ..ScoringRule::default()
        };
        let total: Decimal = [(1, 40_000), (2, 30_000), (3, 20_000), (4, 10_000)]
            .into_iter()
            .map(|(rank, raw)| rule.calculate(rank, raw))
            .sum();
        assert_eq!(total, dec!(0));

        let unbalanced = ScoringRule {
            oka: 5,
            ..ScoringRule::default()
        };
        let total: Decimal = [(1, 40_000), (2, 30_000), (3, 20_000), (4, 10_000)]
            .into_iter()
            .map(|(rank, raw)| unbalanced.calculate(rank, raw))
            .sum();
        assert_eq!(total, dec!(-15));
    }

    #[rstest]
    #[case(1, true)]
    #[case(4, true)]
    #[case(0, false)]
    #[case(5, false)]
    fn rank_validation(#[case] value: i32, #[case] valid: bool) {
        assert_eq!(Rank::new(value).is_ok(), valid);
    }
}
