//! Recorded games and their four player results.
//!
//! A game always owns exactly four players holding ranks one to four once
//! each. Calculated scores are derived from the game's rule when the game is
//! recorded and again whenever the lineup or the rule changes.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{
    GameId, GamePlayerId, Location, LocationId, Rank, RankOutOfRange, Rule, RuleId, ScoringRule,
    User, UserId,
};

/// Number of players in a game.
pub const PLAYERS_PER_GAME: usize = 4;

/// Validation errors raised while assembling a lineup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameValidationError {
    #[error("a game needs exactly {expected} players, got {actual}")]
    WrongPlayerCount { expected: usize, actual: usize },
    #[error(transparent)]
    RankOutOfRange(#[from] RankOutOfRange),
    #[error("rank {rank} is assigned to more than one player")]
    DuplicateRank { rank: i32 },
    #[error("user {user_id} appears more than once")]
    DuplicateUser { user_id: UserId },
}

/// One player's raw result before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerEntry {
    pub user_id: UserId,
    pub rank: Rank,
    pub score: i32,
}

impl PlayerEntry {
    /// Validate the rank and build an entry.
    pub fn new(user_id: UserId, rank: i32, score: i32) -> Result<Self, GameValidationError> {
        Ok(Self {
            user_id,
            rank: Rank::new(rank)?,
            score,
        })
    }
}

/// Four entries with distinct users and distinct ranks.
///
/// # Examples
/// ```
/// use mahjong_ledger::domain::{PlayerEntry, PlayerLineup, UserId};
///
/// let entries = (1..=4)
///     .map(|rank| PlayerEntry::new(UserId::random(), rank, 25_000).expect("valid rank"))
///     .collect();
/// assert!(PlayerLineup::new(entries).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLineup(Vec<PlayerEntry>);

impl PlayerLineup {
    /// Validate the player count and the uniqueness of ranks and users.
    pub fn new(entries: Vec<PlayerEntry>) -> Result<Self, GameValidationError> {
        if entries.len() != PLAYERS_PER_GAME {
            return Err(GameValidationError::WrongPlayerCount {
                expected: PLAYERS_PER_GAME,
                actual: entries.len(),
            });
        }

        let mut ranks = HashSet::with_capacity(PLAYERS_PER_GAME);
        let mut users = HashSet::with_capacity(PLAYERS_PER_GAME);
        for entry in &entries {
            if !ranks.insert(entry.rank) {
                return Err(GameValidationError::DuplicateRank {
                    rank: entry.rank.get(),
                });
            }
            if !users.insert(entry.user_id) {
                return Err(GameValidationError::DuplicateUser {
                    user_id: entry.user_id,
                });
            }
        }

        Ok(Self(entries))
    }

    /// Entries in the order they were supplied.
    pub fn entries(&self) -> &[PlayerEntry] {
        &self.0
    }

    /// Distinct users in the lineup.
    pub fn user_ids(&self) -> Vec<UserId> {
        self.0.iter().map(|entry| entry.user_id).collect()
    }

    /// Score every entry against `rule`, ordered by rank.
    fn score(&self, rule: &ScoringRule) -> Vec<GamePlayer> {
        let mut players: Vec<GamePlayer> = self
            .0
            .iter()
            .map(|entry| GamePlayer {
                id: GamePlayerId::random(),
                user_id: entry.user_id,
                rank: entry.rank,
                score: entry.score,
                calculated_score: rule.calculate(entry.rank.get(), entry.score),
            })
            .collect();
        players.sort_by_key(|player| player.rank);
        players
    }
}

/// A scored player row belonging to a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePlayer {
    pub id: GamePlayerId,
    pub user_id: UserId,
    pub rank: Rank,
    pub score: i32,
    pub calculated_score: Decimal,
}

/// A recorded game with its players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: GameId,
    pub rule_id: RuleId,
    pub location_id: Option<LocationId>,
    pub creator: UserId,
    pub played_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub players: Vec<GamePlayer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDraft {
    pub rule_id: RuleId,
    pub location_id: Option<LocationId>,
    pub played_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub players: PlayerLineup,
}

/// Partial update of a game.
///
/// The doubled options distinguish "leave unchanged" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatch {
    pub rule_id: Option<RuleId>,
    pub location_id: Option<Option<LocationId>>,
    pub played_at: Option<DateTime<Utc>>,
    pub notes: Option<Option<String>>,
    pub players: Option<PlayerLineup>,
}

impl Game {
    /// Record a new game, scoring the lineup with `rule`.
    pub fn record(
        id: GameId,
        creator: UserId,
        draft: GameDraft,
        rule: &ScoringRule,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            rule_id: draft.rule_id,
            location_id: draft.location_id,
            creator,
            played_at: draft.played_at,
            notes: draft.notes,
            players: draft.players.score(rule),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch. `rule` must be the rule in effect once the patch is
    /// applied.
    ///
    /// A supplied lineup replaces the old one wholesale and is scored with
    /// `rule`. Without one, the existing entries are rescored only when the
    /// patch moves the game to a different rule; otherwise the stored
    /// calculated scores are kept as recorded.
    pub fn revise(&mut self, patch: GamePatch, rule: &ScoringRule, now: DateTime<Utc>) {
        let GamePatch {
            rule_id,
            location_id,
            played_at,
            notes,
            players,
        } = patch;

        let rule_changed = rule_id.is_some_and(|id| id != self.rule_id);
        if let Some(rule_id) = rule_id {
            self.rule_id = rule_id;
        }
        if let Some(location_id) = location_id {
            self.location_id = location_id;
        }
        if let Some(played_at) = played_at {
            self.played_at = played_at;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        match players {
            Some(lineup) => self.players = lineup.score(rule),
            None if rule_changed => self.players = self.lineup().score(rule),
            None => {}
        }
        self.updated_at = now;
    }

    /// The raw entries behind the current players.
    pub fn lineup(&self) -> PlayerLineup {
        PlayerLineup(
            self.players
                .iter()
                .map(|player| PlayerEntry {
                    user_id: player.user_id,
                    rank: player.rank,
                    score: player.score,
                })
                .collect(),
        )
    }

    /// Whether `user` recorded this game.
    pub fn is_created_by(&self, user: &UserId) -> bool {
        &self.creator == user
    }
}

/// Which games a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameListFilter {
    /// Games the user created or played in.
    VisibleTo(UserId),
    /// Games the user played in.
    PlayedBy(UserId),
}

/// A game with its related entities eagerly loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
    pub game: Game,
    pub rule: Rule,
    pub location: Option<Location>,
    pub creator: User,
    pub users: Vec<User>,
}

impl GameDetails {
    /// Look up a loaded player's user record.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id() == id)
    }
}
