//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are consumed by inbound adapters.
//! Driven ports (`*Repository`) are implemented by outbound adapters and
//! expose typed errors that services translate into domain errors.

mod macros;
pub(crate) use macros::define_port_error;

mod game_command;
mod game_query;
mod game_repository;
mod location_command;
mod location_query;
mod location_repository;
mod rule_command;
mod rule_query;
mod rule_repository;
mod score_repository;
mod statistics_query;
mod user_repository;

#[cfg(test)]
pub use game_command::MockGameCommand;
pub use game_command::{CreateGameRequest, GameCommand, UpdateGameRequest};
#[cfg(test)]
pub use game_query::MockGameQuery;
pub use game_query::GameQuery;
#[cfg(test)]
pub use game_repository::MockGameRepository;
pub use game_repository::{FixtureGameRepository, GameRepository, GameRepositoryError};
#[cfg(test)]
pub use location_command::MockLocationCommand;
pub use location_command::LocationCommand;
#[cfg(test)]
pub use location_query::MockLocationQuery;
pub use location_query::LocationQuery;
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{
    FixtureLocationRepository, LocationRepository, LocationRepositoryError,
};
#[cfg(test)]
pub use rule_command::MockRuleCommand;
pub use rule_command::{CreateRuleRequest, RuleCommand, UpdateRuleRequest};
#[cfg(test)]
pub use rule_query::MockRuleQuery;
pub use rule_query::RuleQuery;
#[cfg(test)]
pub use rule_repository::MockRuleRepository;
pub use rule_repository::{FixtureRuleRepository, RuleRepository, RuleRepositoryError};
#[cfg(test)]
pub use score_repository::MockScoreRepository;
pub use score_repository::{FixtureScoreRepository, ScoreRepository, ScoreRepositoryError};
#[cfg(test)]
pub use statistics_query::MockStatisticsQuery;
pub use statistics_query::StatisticsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
