//! Game HTTP handlers.
//!
//! ```text
//! GET    /api/v1/games
//! POST   /api/v1/games
//! GET    /api/v1/games/{id}
//! PUT    /api/v1/games/{id}
//! DELETE /api/v1/games/{id}
//! GET    /api/v1/games/user/{user_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ports::{CreateGameRequest, UpdateGameRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::games_dto::{
    CreateGamePayload, GameResponse, UpdateGamePayload, parse_create, parse_update,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const GAME_ID: FieldName = FieldName::new("id");
const USER_ID: FieldName = FieldName::new("user_id");

fn responses(games: Vec<crate::domain::GameDetails>) -> Vec<GameResponse> {
    games.into_iter().map(GameResponse::from).collect()
}

/// Games the caller created or played in, most recently played first.
#[utoipa::path(
    get,
    path = "/api/v1/games",
    responses(
        (status = 200, description = "Visible games", body = [GameResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "listGames"
)]
#[get("/games")]
pub async fn list_games(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<GameResponse>>> {
    let actor = session.require_user_id()?;
    let games = state.games_query.list_visible(actor).await?;
    Ok(web::Json(responses(games)))
}

/// Record a game and score its four players with the chosen rule.
#[utoipa::path(
    post,
    path = "/api/v1/games",
    request_body = CreateGamePayload,
    responses(
        (status = 201, description = "Game recorded", body = GameResponse),
        (status = 400, description = "Invalid request or unknown reference", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Write failed and was rolled back", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "createGame"
)]
#[post("/games")]
pub async fn create_game(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateGamePayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let draft = parse_create(payload.into_inner())?;
    let details = state.games.create(CreateGameRequest { actor, draft }).await?;
    Ok(HttpResponse::Created().json(GameResponse::from(details)))
}

/// Games the given user played in, most recently played first.
#[utoipa::path(
    get,
    path = "/api/v1/games/user/{user_id}",
    params(("user_id" = String, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Games played by the user", body = [GameResponse]),
        (status = 400, description = "Malformed user id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "listGamesByUser"
)]
#[get("/games/user/{user_id}")]
pub async fn list_user_games(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<GameResponse>>> {
    session.require_user_id()?;
    let user = parse_id(&path, USER_ID)?;
    let games = state.games_query.list_played_by(user).await?;
    Ok(web::Json(responses(games)))
}

/// Show any game to a signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/games/{id}",
    params(("id" = String, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown game", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "getGame"
)]
#[get("/games/{id}")]
pub async fn get_game(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<GameResponse>> {
    session.require_user_id()?;
    let game_id = parse_id(&path, GAME_ID)?;
    let details = state.games_query.get(game_id).await?;
    Ok(web::Json(GameResponse::from(details)))
}

/// Edit a game the caller created. Supplied players replace the old four
/// and every player is rescored with the resulting rule.
#[utoipa::path(
    put,
    path = "/api/v1/games/{id}",
    params(("id" = String, Path, description = "Game identifier")),
    request_body = UpdateGamePayload,
    responses(
        (status = 200, description = "Updated game", body = GameResponse),
        (status = 400, description = "Invalid request or unknown reference", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the game creator", body = ErrorSchema),
        (status = 404, description = "Unknown game", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "updateGame"
)]
#[put("/games/{id}")]
pub async fn update_game(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateGamePayload>,
) -> ApiResult<web::Json<GameResponse>> {
    let actor = session.require_user_id()?;
    let game_id = parse_id(&path, GAME_ID)?;
    let patch = parse_update(payload.into_inner())?;
    let details = state
        .games
        .update(UpdateGameRequest {
            actor,
            game_id,
            patch,
        })
        .await?;
    Ok(web::Json(GameResponse::from(details)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/games/{id}",
    params(("id" = String, Path, description = "Game identifier")),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the game creator", body = ErrorSchema),
        (status = 404, description = "Unknown game", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "deleteGame"
)]
#[delete("/games/{id}")]
pub async fn delete_game(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let game_id = parse_id(&path, GAME_ID)?;
    state.games.delete(actor, game_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "games_tests.rs"]
mod tests;
