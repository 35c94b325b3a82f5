//! Session helpers to keep HTTP handlers free of token and cookie plumbing.
//!
//! The session lives in a signed `auth-token` cookie. Handlers receive a
//! [`SessionContext`] which exposes the verified claims, if any, and builds
//! the cookies that start or end a session.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use tracing::debug;

use crate::domain::ports::SessionTokenService;
use crate::domain::{Error, SESSION_TTL_SECS, SessionClaims, User, UserId};
use crate::inbound::http::state::HttpState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "auth-token";

/// Verify the session cookie on `req`, if present.
///
/// Missing, malformed and expired tokens all yield `None`.
pub(crate) fn claims_from_request(
    req: &HttpRequest,
    tokens: &dyn SessionTokenService,
) -> Option<SessionClaims> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    match tokens.verify(cookie.value()) {
        Ok(claims) => Some(claims),
        Err(error) => {
            debug!(%error, "ignoring unusable session cookie");
            None
        }
    }
}

/// Verified session state for the current request.
#[derive(Clone)]
pub struct SessionContext {
    claims: Option<SessionClaims>,
    tokens: Arc<dyn SessionTokenService>,
    cookie_secure: bool,
}

impl SessionContext {
    /// Construct a context from already verified claims.
    pub fn new(
        claims: Option<SessionClaims>,
        tokens: Arc<dyn SessionTokenService>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            claims,
            tokens,
            cookie_secure,
        }
    }

    /// Claims carried by a valid session cookie.
    pub fn claims(&self) -> Option<&SessionClaims> {
        self.claims.as_ref()
    }

    /// The signed-in user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.claims.as_ref().map(|claims| claims.user_id)
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("Not authenticated"))
    }

    /// Issue a token for `user` and wrap it in the session cookie.
    pub fn start(&self, user: &User) -> Result<Cookie<'static>, Error> {
        let claims = SessionClaims {
            user_id: user.id,
            email: user.email.clone(),
        };
        let token = self
            .tokens
            .issue(&claims)
            .map_err(|error| Error::internal(format!("failed to issue session: {error}")))?;
        Ok(self.cookie(token))
    }

    /// Cookie instructing the client to drop its session.
    pub fn end(&self) -> Cookie<'static> {
        let mut cookie = self.cookie(String::new());
        cookie.make_removal();
        cookie
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, value)
            .http_only(true)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(CookieDuration::seconds(SESSION_TTL_SECS))
            .secure(self.cookie_secure)
            .finish()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return ready(Err(Error::internal("HTTP state is not registered").into()));
        };
        let claims = claims_from_request(req, state.tokens.as_ref());
        ready(Ok(Self::new(claims, state.tokens.clone(), state.cookie_secure)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use crate::domain::ports::{MockSessionTokenService, SessionTokenError};
    use crate::inbound::http::test_utils::{state_with_tokens, test_user};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    fn claims_for(user: &User) -> SessionClaims {
        SessionClaims {
            user_id: user.id,
            email: user.email.clone(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_cookie_yields_user_id() {
        let user = test_user();
        let expected = claims_for(&user);
        let mut tokens = MockSessionTokenService::new();
        tokens
            .expect_verify()
            .withf(|token| token == "good")
            .return_once(move |_| Ok(expected));
        let app = actix_test::init_service(
            App::new().app_data(state_with_tokens(tokens)).route(
                "/",
                web::get().to(|session: SessionContext| async move {
                    let id = session.require_user_id()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                }),
            ),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/")
                .cookie(Cookie::new(SESSION_COOKIE, "good"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body, user.id.to_string().as_bytes());
    }

    #[rstest]
    #[case::missing(None)]
    #[case::expired(Some(SessionTokenError::expired()))]
    #[case::tampered(Some(SessionTokenError::invalid("bad signature")))]
    #[actix_web::test]
    async fn unusable_cookies_are_anonymous(#[case] failure: Option<SessionTokenError>) {
        let mut tokens = MockSessionTokenService::new();
        let send_cookie = failure.is_some();
        if let Some(error) = failure {
            tokens.expect_verify().return_once(move |_| Err(error));
        }
        let app = actix_test::init_service(
            App::new().app_data(state_with_tokens(tokens)).route(
                "/",
                web::get().to(|session: SessionContext| async move {
                    session.require_user_id()?;
                    Ok::<_, Error>(HttpResponse::Ok().finish())
                }),
            ),
        )
        .await;

        let mut request = actix_test::TestRequest::get().uri("/");
        if send_cookie {
            request = request.cookie(Cookie::new(SESSION_COOKIE, "stale"));
        }
        let response = actix_test::call_service(&app, request.to_request()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    fn start_builds_hardened_cookie() {
        let user = test_user();
        let mut tokens = MockSessionTokenService::new();
        tokens
            .expect_issue()
            .return_once(|_| Ok("signed".to_owned()));
        let session = SessionContext::new(None, Arc::new(tokens), true);

        let cookie = session.start(&user).expect("cookie issued");

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "signed");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(CookieDuration::seconds(SESSION_TTL_SECS))
        );
    }

    #[rstest]
    fn end_builds_removal_cookie() {
        let session = SessionContext::new(
            Some(SessionClaims {
                user_id: UserId::random(),
                email: EmailAddress::parse("ada@example.com").expect("email"),
            }),
            Arc::new(MockSessionTokenService::new()),
            false,
        );

        let cookie = session.end();

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
