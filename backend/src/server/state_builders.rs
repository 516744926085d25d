//! Builders wiring domain services over persistence adapters into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use mahjong_ledger::domain::ports::{
    FixtureGameRepository, FixtureLocationRepository, FixtureRuleRepository,
    FixtureScoreRepository, FixtureUserRepository, GameRepository, LocationRepository,
    RuleRepository, ScoreRepository, UserRepository,
};
use mahjong_ledger::domain::{GameService, LocationService, RuleService, StatisticsService};
use mahjong_ledger::inbound::http::state::HttpState;
use mahjong_ledger::outbound::persistence::{
    DbPool, DieselGameRepository, DieselLocationRepository, DieselRuleRepository,
    DieselScoreRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repository set shared by the domain services.
struct Repositories<R, L, G, U, S> {
    rules: Arc<R>,
    locations: Arc<L>,
    games: Arc<G>,
    users: Arc<U>,
    scores: Arc<S>,
}

impl
    Repositories<
        DieselRuleRepository,
        DieselLocationRepository,
        DieselGameRepository,
        DieselUserRepository,
        DieselScoreRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            rules: Arc::new(DieselRuleRepository::new(pool.clone())),
            locations: Arc::new(DieselLocationRepository::new(pool.clone())),
            games: Arc::new(DieselGameRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            scores: Arc::new(DieselScoreRepository::new(pool.clone())),
        }
    }
}

impl
    Repositories<
        FixtureRuleRepository,
        FixtureLocationRepository,
        FixtureGameRepository,
        FixtureUserRepository,
        FixtureScoreRepository,
    >
{
    fn fixtures() -> Self {
        Self {
            rules: Arc::new(FixtureRuleRepository),
            locations: Arc::new(FixtureLocationRepository),
            games: Arc::new(FixtureGameRepository),
            users: Arc::new(FixtureUserRepository),
            scores: Arc::new(FixtureScoreRepository),
        }
    }
}

impl<R, L, G, U, S> Repositories<R, L, G, U, S>
where
    R: RuleRepository + 'static,
    L: LocationRepository + 'static,
    G: GameRepository + 'static,
    U: UserRepository + 'static,
    S: ScoreRepository + 'static,
{
    fn into_state(self, clock: Arc<dyn Clock>) -> HttpState {
        let rules = Arc::new(RuleService::new(self.rules.clone(), clock.clone()));
        let locations = Arc::new(LocationService::new(self.locations.clone(), clock.clone()));
        let games = Arc::new(GameService::new(
            self.games,
            self.rules,
            self.locations,
            self.users.clone(),
            clock,
        ));
        let statistics = Arc::new(StatisticsService::new(self.scores, self.users));

        HttpState {
            rules: rules.clone(),
            rules_query: rules,
            locations: locations.clone(),
            locations_query: locations,
            games: games.clone(),
            games_query: games,
            statistics,
        }
    }
}

/// Build the HTTP state, backed by PostgreSQL when a pool is configured and
/// by empty fixtures otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => Repositories::diesel(pool).into_state(clock),
        None => {
            info!("no database configured; serving fixture repositories");
            Repositories::fixtures().into_state(clock)
        }
    };
    web::Data::new(state)
}
