//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint under `/api/v1`, the health
//! probes, the request and response DTOs, and the session cookie security
//! scheme. Swagger UI serves it in debug builds and the `openapi-dump`
//! binary prints it for external tooling.

use crate::inbound::http::games_dto::{
    CreateGamePayload, GamePlayerResponse, GameResponse, PlayerRequest, UpdateGamePayload,
    UserResponse,
};
use crate::inbound::http::locations::{LocationRequest, LocationResponse};
use crate::inbound::http::rules::{RuleRequest, RuleResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::statistics::{
    PlayerStatisticsResponse, RankingEntryResponse, UserStatisticsResponse, UserStatisticsSummary,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie carrying the signed-in player's id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mahjong ledger API",
        description = "Record four-player mahjong games, manage scoring rules and locations, and read player statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::rules::list_rules,
        crate::inbound::http::rules::create_rule,
        crate::inbound::http::rules::get_rule,
        crate::inbound::http::rules::update_rule,
        crate::inbound::http::rules::delete_rule,
        crate::inbound::http::locations::list_locations,
        crate::inbound::http::locations::create_location,
        crate::inbound::http::locations::get_location,
        crate::inbound::http::locations::update_location,
        crate::inbound::http::locations::delete_location,
        crate::inbound::http::games::list_games,
        crate::inbound::http::games::create_game,
        crate::inbound::http::games::list_user_games,
        crate::inbound::http::games::get_game,
        crate::inbound::http::games::update_game,
        crate::inbound::http::games::delete_game,
        crate::inbound::http::statistics::all_statistics,
        crate::inbound::http::statistics::user_statistics,
        crate::inbound::http::statistics::ranking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RuleRequest,
        RuleResponse,
        LocationRequest,
        LocationResponse,
        PlayerRequest,
        CreateGamePayload,
        UpdateGamePayload,
        UserResponse,
        GamePlayerResponse,
        GameResponse,
        PlayerStatisticsResponse,
        UserStatisticsResponse,
        UserStatisticsSummary,
        RankingEntryResponse,
    )),
    tags(
        (name = "rules", description = "Scoring rules owned by the caller"),
        (name = "locations", description = "Places where games are played"),
        (name = "games", description = "Recorded games and their scored players"),
        (name = "scores", description = "Player statistics and the ranking table"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
