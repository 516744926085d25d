//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities for rules, locations, games, and
//! player statistics, plus the services that implement the driving ports.
//! Types enforce their invariants at construction; adapters never see an
//! unvalidated rule name, rank, or lineup.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - ScoringRule / Rank / Uma: the score calculator and its inputs.
//! - Rule, Location, Game and their drafts and patches.
//! - PlayerStatistics / RankingEntry: aggregates over recorded games.

pub mod error;
pub mod game;
mod game_service;
pub mod ids;
pub mod location;
mod location_service;
pub mod ports;
pub mod rule;
mod rule_service;
pub mod scoring;
pub mod statistics;
mod statistics_service;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::game::{
    Game, GameDetails, GameDraft, GameListFilter, GamePatch, GamePlayer, GameValidationError,
    PLAYERS_PER_GAME, PlayerEntry, PlayerLineup,
};
pub use self::game_service::GameService;
pub use self::ids::{GameId, GamePlayerId, IdValidationError, LocationId, RuleId, UserId};
pub use self::location::{
    LOCATION_NAME_MAX, Location, LocationDraft, LocationName, LocationValidationError,
};
pub use self::location_service::LocationService;
pub use self::rule::{RULE_NAME_MAX, Rule, RuleDraft, RuleName, RulePatch, RuleValidationError};
pub use self::rule_service::RuleService;
pub use self::scoring::{
    DEFAULT_OKA, DEFAULT_RETURN_POINTS, DEFAULT_STARTING_POINTS, DEFAULT_UMA, Rank,
    RankOutOfRange, SCORE_SCALE, ScoringRule, Uma,
};
pub use self::statistics::{
    PlayerScoreRow, PlayerStatistics, RANKING_MIN_GAMES, RankingEntry, aggregate_statistics,
    rank_players, summarise_player,
};
pub use self::statistics_service::StatisticsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::User;

