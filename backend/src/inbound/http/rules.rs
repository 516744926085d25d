//! Scoring rule HTTP handlers.
//!
//! ```text
//! GET    /api/v1/rules
//! POST   /api/v1/rules
//! GET    /api/v1/rules/{id}
//! PUT    /api/v1/rules/{id}
//! DELETE /api/v1/rules/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateRuleRequest, UpdateRuleRequest};
use crate::domain::{
    Error, Rule, RuleDraft, RuleId, RuleName, RulePatch, RuleValidationError, ScoringRule, Uma,
    UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, missing_field_error, parse_id,
};

const NAME: FieldName = FieldName::new("name");
const RULE_ID: FieldName = FieldName::new("id");

/// Rule payload for create and update.
///
/// Every field is optional on update. On create only `name` is required;
/// omitted point values fall back to 25000/30000, uma 20/10/-10/-20, oka 0.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RuleRequest {
    #[schema(example = "M-League")]
    pub name: Option<String>,
    #[schema(example = 25000)]
    pub starting_points: Option<i32>,
    #[schema(example = 30000)]
    pub return_points: Option<i32>,
    #[schema(example = 30)]
    pub uma_1: Option<i32>,
    #[schema(example = 10)]
    pub uma_2: Option<i32>,
    #[schema(example = -10)]
    pub uma_3: Option<i32>,
    #[schema(example = -30)]
    pub uma_4: Option<i32>,
    #[schema(example = 20)]
    pub oka: Option<i32>,
    pub is_default: Option<bool>,
}

/// Rule as returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RuleResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: RuleId,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub name: String,
    pub starting_points: i32,
    pub return_points: i32,
    pub uma_1: i32,
    pub uma_2: i32,
    pub uma_3: i32,
    pub uma_4: i32,
    pub oka: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Rule> for RuleResponse {
    fn from(rule: Rule) -> Self {
        let [uma_1, uma_2, uma_3, uma_4] = rule.scoring.uma.values();
        Self {
            id: rule.id,
            user_id: rule.owner,
            name: rule.name.as_ref().to_owned(),
            starting_points: rule.scoring.starting_points,
            return_points: rule.scoring.return_points,
            uma_1,
            uma_2,
            uma_3,
            uma_4,
            oka: rule.scoring.oka,
            is_default: rule.is_default,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

fn parse_name(raw: String) -> Result<RuleName, Error> {
    RuleName::new(raw).map_err(|err| {
        let code = match err {
            RuleValidationError::EmptyName => "blank",
            RuleValidationError::NameTooLong { .. } => "too_long",
        };
        invalid_field_error(NAME, code, err.to_string())
    })
}

fn parse_draft(payload: RuleRequest) -> Result<RuleDraft, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error(NAME))?;
    let defaults = ScoringRule::default();
    let [uma_1, uma_2, uma_3, uma_4] = defaults.uma.values();
    Ok(RuleDraft {
        name: parse_name(name)?,
        scoring: ScoringRule {
            starting_points: payload.starting_points.unwrap_or(defaults.starting_points),
            return_points: payload.return_points.unwrap_or(defaults.return_points),
            uma: Uma::new([
                payload.uma_1.unwrap_or(uma_1),
                payload.uma_2.unwrap_or(uma_2),
                payload.uma_3.unwrap_or(uma_3),
                payload.uma_4.unwrap_or(uma_4),
            ]),
            oka: payload.oka.unwrap_or(defaults.oka),
        },
        is_default: payload.is_default.unwrap_or(false),
    })
}

fn parse_patch(payload: RuleRequest) -> Result<RulePatch, Error> {
    Ok(RulePatch {
        name: payload.name.map(parse_name).transpose()?,
        starting_points: payload.starting_points,
        return_points: payload.return_points,
        uma: [payload.uma_1, payload.uma_2, payload.uma_3, payload.uma_4],
        oka: payload.oka,
        is_default: payload.is_default,
    })
}

/// List the caller's rules, default first, then newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rules",
    responses(
        (status = 200, description = "Caller's rules", body = [RuleResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["rules"],
    operation_id = "listRules"
)]
#[get("/rules")]
pub async fn list_rules(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RuleResponse>>> {
    let actor = session.require_user_id()?;
    let rules = state.rules_query.list(actor).await?;
    Ok(web::Json(rules.into_iter().map(RuleResponse::from).collect()))
}

/// Register a rule. Setting `is_default` clears the caller's previous default.
#[utoipa::path(
    post,
    path = "/api/v1/rules",
    request_body = RuleRequest,
    responses(
        (status = 201, description = "Rule created", body = RuleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["rules"],
    operation_id = "createRule"
)]
#[post("/rules")]
pub async fn create_rule(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RuleRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let draft = parse_draft(payload.into_inner())?;
    let rule = state.rules.create(CreateRuleRequest { actor, draft }).await?;
    Ok(HttpResponse::Created().json(RuleResponse::from(rule)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rules/{id}",
    params(("id" = String, Path, description = "Rule identifier")),
    responses(
        (status = 200, description = "Rule", body = RuleResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the rule owner", body = ErrorSchema),
        (status = 404, description = "Unknown rule", body = ErrorSchema)
    ),
    tags = ["rules"],
    operation_id = "getRule"
)]
#[get("/rules/{id}")]
pub async fn get_rule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RuleResponse>> {
    let actor = session.require_user_id()?;
    let rule_id = parse_id(&path, RULE_ID)?;
    let rule = state.rules_query.get(actor, rule_id).await?;
    Ok(web::Json(RuleResponse::from(rule)))
}

/// Partially update a rule the caller owns.
#[utoipa::path(
    put,
    path = "/api/v1/rules/{id}",
    params(("id" = String, Path, description = "Rule identifier")),
    request_body = RuleRequest,
    responses(
        (status = 200, description = "Updated rule", body = RuleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the rule owner", body = ErrorSchema),
        (status = 404, description = "Unknown rule", body = ErrorSchema)
    ),
    tags = ["rules"],
    operation_id = "updateRule"
)]
#[put("/rules/{id}")]
pub async fn update_rule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RuleRequest>,
) -> ApiResult<web::Json<RuleResponse>> {
    let actor = session.require_user_id()?;
    let rule_id = parse_id(&path, RULE_ID)?;
    let patch = parse_patch(payload.into_inner())?;
    let rule = state
        .rules
        .update(UpdateRuleRequest {
            actor,
            rule_id,
            patch,
        })
        .await?;
    Ok(web::Json(RuleResponse::from(rule)))
}

/// Delete a rule the caller owns, together with the games recorded under it.
#[utoipa::path(
    delete,
    path = "/api/v1/rules/{id}",
    params(("id" = String, Path, description = "Rule identifier")),
    responses(
        (status = 204, description = "Rule deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the rule owner", body = ErrorSchema),
        (status = 404, description = "Unknown rule", body = ErrorSchema)
    ),
    tags = ["rules"],
    operation_id = "deleteRule"
)]
#[delete("/rules/{id}")]
pub async fn delete_rule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let rule_id = parse_id(&path, RULE_ID)?;
    state.rules.delete(actor, rule_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MockPorts, login_cookie, test_login, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    macro_rules! rules_app {
        ($ports:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new($ports.into_state()))
                    .wrap(test_session_middleware())
                    .route("/test-login/{user_id}", web::get().to(test_login))
                    .service(
                        web::scope("/api/v1")
                            .service(list_rules)
                            .service(create_rule)
                            .service(get_rule)
                            .service(update_rule)
                            .service(delete_rule),
                    ),
            )
            .await
        };
    }

    fn stored_rule(owner: UserId, draft: RuleDraft) -> Rule {
        Rule::from_draft(RuleId::random(), owner, draft, Utc::now())
    }

    #[actix_web::test]
    async fn create_applies_defaults_and_returns_201() {
        let actor = UserId::random();
        let mut ports = MockPorts::default();
        ports
            .rules
            .expect_create()
            .withf(move |request| {
                request.actor == actor
                    && request.draft.name.as_ref() == "House"
                    && request.draft.scoring == ScoringRule::default()
                    && !request.draft.is_default
            })
            .returning(|request| Ok(stored_rule(request.actor, request.draft)));
        let app = rules_app!(ports);
        let cookie = login_cookie(&app, &actor).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/rules")
                .cookie(cookie)
                .set_json(json!({ "name": "House" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["name"], "House");
        assert_eq!(body["return_points"], 30000);
        assert_eq!(body["uma_4"], -20);
        assert_eq!(body["user_id"], actor.to_string());
    }

    #[actix_web::test]
    async fn create_without_name_is_rejected() {
        let actor = UserId::random();
        let app = rules_app!(MockPorts::default());
        let cookie = login_cookie(&app, &actor).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/rules")
                .cookie(cookie)
                .set_json(json!({ "oka": 20 }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "name");
        assert_eq!(body["details"]["code"], "missing_field");
    }

    #[actix_web::test]
    async fn requests_without_session_are_unauthorised() {
        let app = rules_app!(MockPorts::default());
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/v1/rules").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn update_forwards_only_supplied_fields() {
        let actor = UserId::random();
        let rule_id = RuleId::random();
        let mut ports = MockPorts::default();
        ports
            .rules
            .expect_update()
            .withf(move |request| {
                request.rule_id == rule_id
                    && request.patch.oka == Some(20)
                    && request.patch.uma == [None, None, None, Some(-30)]
                    && request.patch.name.is_none()
            })
            .returning(move |request| {
                let mut rule = stored_rule(
                    request.actor,
                    RuleDraft {
                        name: RuleName::new("House").expect("valid name"),
                        scoring: ScoringRule::default(),
                        is_default: false,
                    },
                );
                rule.id = request.rule_id;
                rule.apply(request.patch, Utc::now());
                Ok(rule)
            });
        let app = rules_app!(ports);
        let cookie = login_cookie(&app, &actor).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/rules/{rule_id}"))
                .cookie(cookie)
                .set_json(json!({ "oka": 20, "uma_4": -30 }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["oka"], 20);
        assert_eq!(body["uma_4"], -30);
        assert_eq!(body["uma_1"], 20);
    }

    #[actix_web::test]
    async fn forbidden_delete_surfaces_403() {
        let actor = UserId::random();
        let rule_id = RuleId::random();
        let mut ports = MockPorts::default();
        ports
            .rules
            .expect_delete()
            .with(eq(actor), eq(rule_id))
            .returning(|_, _| Err(Error::forbidden("only the rule owner may access this rule")));
        let app = rules_app!(ports);
        let cookie = login_cookie(&app, &actor).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/rules/{rule_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn malformed_rule_id_is_rejected() {
        let actor = UserId::random();
        let app = rules_app!(MockPorts::default());
        let cookie = login_cookie(&app, &actor).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/rules/not-a-uuid")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "invalid_uuid");
    }

    #[test]
    fn blank_name_is_reported_as_blank() {
        let err = parse_draft(RuleRequest {
            name: Some("  ".to_owned()),
            ..RuleRequest::default()
        })
        .expect_err("blank name");
        assert_eq!(err.details().expect("details")["code"], "blank");
    }
}
