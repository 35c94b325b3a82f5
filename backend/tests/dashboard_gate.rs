//! Dashboard paths redirect to sign-in unless a valid session cookie is sent.

mod support;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::test::{self as actix_test, TestRequest};
use rstest::rstest;

use formly::domain::TRACE_ID_HEADER;
use formly::inbound::http::session::SESSION_COOKIE;
use support::{sign_up, test_app};

#[rstest]
#[case("/dashboard")]
#[case("/dashboard/forms/new")]
#[actix_web::test]
async fn anonymous_dashboard_requests_redirect(#[case] path: &str) {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(&app, TestRequest::get().uri(path).to_request()).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/signin")
    );
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[actix_web::test]
async fn forged_cookies_redirect() {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(
        &app,
        TestRequest::get()
            .uri("/dashboard")
            .cookie(Cookie::new(SESSION_COOKIE, "forged"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
}

#[rstest]
#[actix_web::test]
async fn signed_in_requests_pass_through() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = sign_up(&app, "ada@example.com").await;

    let res = actix_test::call_service(
        &app,
        TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    // No page is mounted at /dashboard in the API server.
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn other_paths_are_not_gated() {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(&app, TestRequest::get().uri("/api/auth/me").to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
