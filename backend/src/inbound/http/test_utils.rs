//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::UserId;
use crate::domain::ports::{
    MockGameCommand, MockGameQuery, MockLocationCommand, MockLocationQuery, MockRuleCommand,
    MockRuleQuery, MockStatisticsQuery,
};

pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie set")
        .into_owned()
}

/// Route registering a session for the user named in the path.
///
/// Mount at `/test-login/{user_id}` alongside the handlers under test.
pub async fn test_login(
    path: web::Path<UserId>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.persist_user(&path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Sign `user` in through [`test_login`] and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test-login/{user}"))
            .to_request(),
    )
    .await;
    session_cookie(&res)
}

/// Mocked driving ports for handler tests.
///
/// Unconfigured mocks panic when called, so each test only sets the
/// expectations its handler needs.
#[derive(Default)]
pub struct MockPorts {
    pub rules: MockRuleCommand,
    pub rules_query: MockRuleQuery,
    pub locations: MockLocationCommand,
    pub locations_query: MockLocationQuery,
    pub games: MockGameCommand,
    pub games_query: MockGameQuery,
    pub statistics: MockStatisticsQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            rules: Arc::new(self.rules),
            rules_query: Arc::new(self.rules_query),
            locations: Arc::new(self.locations),
            locations_query: Arc::new(self.locations_query),
            games: Arc::new(self.games),
            games_query: Arc::new(self.games_query),
            statistics: Arc::new(self.statistics),
        }
    }
}
