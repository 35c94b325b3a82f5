//! Shared wiring for HTTP integration tests over the in-memory store.

#![expect(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::cookie::Cookie;
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use formly::domain::PasswordHash;
use formly::domain::ports::{PasswordHashError, PasswordHasher, SessionTokenService};
use formly::domain::{AccountService, FormService, ResponseSubmissionService};
use formly::inbound::http::configure_api;
use formly::inbound::http::session::SESSION_COOKIE;
use formly::inbound::http::state::{HttpState, HttpStatePorts};
use formly::outbound::memory::InMemoryStore;
use formly::outbound::security::JwtSessionTokens;
use formly::{DashboardGate, Trace};

const TEST_SECRET: [u8; 32] = [7; 32];

/// Reversible stand-in for argon2 so tests stay fast.
struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("plain:{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("plain:{password}"))
    }
}

/// Session token service signing with a fixed test secret.
pub fn tokens() -> Arc<dyn SessionTokenService> {
    Arc::new(JwtSessionTokens::from_secret(&TEST_SECRET).expect("test secret is long enough"))
}

/// Application with the full API mounted under `/api`, the trace middleware
/// and the dashboard gate.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store = Arc::new(InMemoryStore::new());
    let tokens = tokens();
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&store),
        Arc::new(PlainHasher),
    ));
    let forms = Arc::new(FormService::new(Arc::clone(&store)));
    let submissions = Arc::new(ResponseSubmissionService::new(Arc::clone(&store), store));
    let state = HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        account_query: accounts.clone(),
        account_command: accounts,
        form_command: forms.clone(),
        form_query: forms.clone(),
        form_results: forms,
        responses: submissions,
        tokens: Arc::clone(&tokens),
    })
    .with_cookie_secure(false);

    App::new()
        .app_data(web::Data::new(state))
        .wrap(DashboardGate::new(tokens))
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
}

/// `POST /api/auth/signup` for the given account.
pub fn sign_up_request(name: &str, email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "name": name, "email": email, "password": password }))
}

/// `POST /api/auth/signin` with the given credentials.
pub fn sign_in_request(email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": email, "password": password }))
}

/// Session cookie set by a sign-in or sign-up response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Create an account named "Owner" and return its session cookie.
pub async fn sign_up<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(app, sign_up_request("Owner", email, "secret").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK, "sign-up for {email}");
    session_cookie(&res)
}

/// Survey with a required text question and an optional dropdown.
pub fn survey_body(title: &str, published: bool) -> Value {
    json!({
        "title": title,
        "description": "Tell us about yourself",
        "published": published,
        "questions": [
            { "text": "Name", "type": "text", "required": true },
            {
                "text": "Colour",
                "type": "dropdown",
                "required": false,
                "options": ["Red", "Blue"]
            }
        ]
    })
}

/// `POST /api/forms` as the session holder.
pub fn create_form_request(cookie: &Cookie<'static>, body: &Value) -> TestRequest {
    TestRequest::post()
        .uri("/api/forms")
        .cookie(cookie.clone())
        .set_json(body)
}

/// Question ids of a serialized form, in order.
pub fn question_ids(form: &Value) -> Vec<String> {
    form["questions"]
        .as_array()
        .expect("questions array")
        .iter()
        .map(|question| question["id"].as_str().expect("question id").to_owned())
        .collect()
}
