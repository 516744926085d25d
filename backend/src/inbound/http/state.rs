//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    GameCommand, GameQuery, LocationCommand, LocationQuery, RuleCommand, RuleQuery,
    StatisticsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub rules: Arc<dyn RuleCommand>,
    pub rules_query: Arc<dyn RuleQuery>,
    pub locations: Arc<dyn LocationCommand>,
    pub locations_query: Arc<dyn LocationQuery>,
    pub games: Arc<dyn GameCommand>,
    pub games_query: Arc<dyn GameQuery>,
    pub statistics: Arc<dyn StatisticsQuery>,
}
