//! Location HTTP handlers.
//!
//! ```text
//! GET    /api/v1/locations
//! POST   /api/v1/locations
//! GET    /api/v1/locations/{id}
//! PUT    /api/v1/locations/{id}
//! DELETE /api/v1/locations/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Location, LocationDraft, LocationId, LocationName, LocationValidationError, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, missing_field_error, parse_id,
};

const NAME: FieldName = FieldName::new("name");
const LOCATION_ID: FieldName = FieldName::new("id");

/// Location payload. Update replaces every field, so `name` is always
/// required and omitted optional fields are cleared.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LocationRequest {
    #[schema(example = "Jansou Shibuya")]
    pub name: Option<String>,
    #[schema(example = "1-2-3 Dogenzaka, Shibuya")]
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Location as returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LocationResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: LocationId,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub name: String,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            user_id: location.owner,
            name: location.name.as_ref().to_owned(),
            address: location.address,
            notes: location.notes,
            created_at: location.created_at,
            updated_at: location.updated_at,
        }
    }
}

fn parse_draft(payload: LocationRequest) -> Result<LocationDraft, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error(NAME))?;
    let name = LocationName::new(name).map_err(|err| {
        let code = match err {
            LocationValidationError::EmptyName => "blank",
            LocationValidationError::NameTooLong { .. } => "too_long",
        };
        invalid_field_error(NAME, code, err.to_string())
    })?;
    Ok(LocationDraft {
        name,
        address: payload.address,
        notes: payload.notes,
    })
}

/// List the caller's locations, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Caller's locations", body = [LocationResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listLocations"
)]
#[get("/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<LocationResponse>>> {
    let actor = session.require_user_id()?;
    let locations = state.locations_query.list(actor).await?;
    Ok(web::Json(
        locations.into_iter().map(LocationResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/locations",
    request_body = LocationRequest,
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "createLocation"
)]
#[post("/locations")]
pub async fn create_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LocationRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let draft = parse_draft(payload.into_inner())?;
    let location = state.locations.create(actor, draft).await?;
    Ok(HttpResponse::Created().json(LocationResponse::from(location)))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}",
    params(("id" = String, Path, description = "Location identifier")),
    responses(
        (status = 200, description = "Location", body = LocationResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the location owner", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "getLocation"
)]
#[get("/locations/{id}")]
pub async fn get_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LocationResponse>> {
    let actor = session.require_user_id()?;
    let location_id = parse_id(&path, LOCATION_ID)?;
    let location = state.locations_query.get(actor, location_id).await?;
    Ok(web::Json(LocationResponse::from(location)))
}

#[utoipa::path(
    put,
    path = "/api/v1/locations/{id}",
    params(("id" = String, Path, description = "Location identifier")),
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Updated location", body = LocationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the location owner", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "updateLocation"
)]
#[put("/locations/{id}")]
pub async fn update_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<LocationRequest>,
) -> ApiResult<web::Json<LocationResponse>> {
    let actor = session.require_user_id()?;
    let location_id = parse_id(&path, LOCATION_ID)?;
    let draft = parse_draft(payload.into_inner())?;
    let location = state.locations.update(actor, location_id, draft).await?;
    Ok(web::Json(LocationResponse::from(location)))
}

/// Delete a location. Games played there keep their results and lose the
/// location reference.
#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    params(("id" = String, Path, description = "Location identifier")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the location owner", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "deleteLocation"
)]
#[delete("/locations/{id}")]
pub async fn delete_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let location_id = parse_id(&path, LOCATION_ID)?;
    state.locations.delete(actor, location_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MockPorts, login_cookie, test_login, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    macro_rules! locations_app {
        ($ports:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($ports.into_state()))
                    .wrap(test_session_middleware())
                    .route("/test-login/{user_id}", web::get().to(test_login))
                    .service(
                        web::scope("/api/v1")
                            .service(list_locations)
                            .service(create_location)
                            .service(get_location)
                            .service(update_location)
                            .service(delete_location),
                    ),
            )
            .await
        };
    }

    fn stored(owner: UserId, name: &str) -> Location {
        Location::from_draft(
            LocationId::random(),
            owner,
            LocationDraft {
                name: LocationName::new(name).expect("valid name"),
                address: None,
                notes: None,
            },
            Utc::now(),
        )
    }

    #[actix_web::test]
    async fn lists_the_callers_locations() {
        let actor = UserId::random();
        let mut ports = MockPorts::default();
        ports
            .locations_query
            .expect_list()
            .with(eq(actor))
            .returning(move |owner| Ok(vec![stored(owner, "Club"), stored(owner, "Home")]));
        let app = locations_app!(ports);
        let cookie = login_cookie(&app, &actor).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/locations")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<LocationResponse> = test::read_body_json(res).await;
        let names: Vec<_> = body.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Club", "Home"]);
    }

    #[actix_web::test]
    async fn create_returns_201() {
        let actor = UserId::random();
        let mut ports = MockPorts::default();
        ports
            .locations
            .expect_create()
            .withf(move |owner, draft| {
                *owner == actor && draft.address.as_deref() == Some("Shinjuku")
            })
            .returning(|owner, draft| {
                Ok(Location::from_draft(LocationId::random(), owner, draft, Utc::now()))
            });
        let app = locations_app!(ports);
        let cookie = login_cookie(&app, &actor).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/locations")
                .cookie(cookie)
                .set_json(json!({ "name": "Parlour", "address": "Shinjuku" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["address"], "Shinjuku");
        assert!(body["notes"].is_null());
    }

    #[actix_web::test]
    async fn overlong_name_is_rejected() {
        let actor = UserId::random();
        let app = locations_app!(MockPorts::default());
        let cookie = login_cookie(&app, &actor).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/locations")
                .cookie(cookie)
                .set_json(json!({ "name": "x".repeat(256) }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "too_long");
    }

    #[actix_web::test]
    async fn update_of_unknown_location_is_404() {
        let actor = UserId::random();
        let location_id = LocationId::random();
        let mut ports = MockPorts::default();
        ports
            .locations
            .expect_update()
            .withf(move |_, id, _| *id == location_id)
            .returning(|_, _, _| Err(Error::not_found("location not found")));
        let app = locations_app!(ports);
        let cookie = login_cookie(&app, &actor).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/locations/{location_id}"))
                .cookie(cookie)
                .set_json(json!({ "name": "Moved" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_returns_204() {
        let actor = UserId::random();
        let location_id = LocationId::random();
        let mut ports = MockPorts::default();
        ports
            .locations
            .expect_delete()
            .with(eq(actor), eq(location_id))
            .returning(|_, _| Ok(()));
        let app = locations_app!(ports);
        let cookie = login_cookie(&app, &actor).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/locations/{location_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
