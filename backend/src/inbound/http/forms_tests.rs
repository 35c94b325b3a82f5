//! Tests for form HTTP handlers.

use super::*;
use crate::domain::{FormDetail, UserId};
use crate::inbound::http::test_utils::{
    MockPorts, sample_form, session_cookie, sign_in_as, test_user,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(ports.into_state()).service(
        web::scope("/api")
            .service(list_forms)
            .service(create_form)
            .service(get_form)
            .service(replace_form)
            .service(delete_form),
    )
}

fn valid_payload() -> Value {
    json!({
        "title": "Feedback",
        "description": "",
        "questions": [
            { "text": "Name", "type": "text", "required": true }
        ]
    })
}

#[rstest]
#[actix_web::test]
async fn list_requires_session() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/forms").to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn list_returns_owned_forms() {
    let user = test_user();
    let form = sample_form(user.id);
    let expected_id = form.id.to_string();
    let mut ports = MockPorts::default();
    sign_in_as(&mut ports, &user);
    let owner = user.id;
    ports
        .form_query
        .expect_list_owned()
        .withf(move |id| *id == owner)
        .return_once(move |_| Ok(vec![form]));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/forms")
            .cookie(session_cookie())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|value| value.to_str().ok()),
        Some("private, no-cache, must-revalidate")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body[0]["id"], expected_id);
    assert_eq!(body[0]["questions"][1]["options"], json!(["Red", "Blue"]));
}

#[rstest]
#[actix_web::test]
async fn create_validates_before_storing() {
    let user = test_user();
    let mut ports = MockPorts::default();
    sign_in_as(&mut ports, &user);
    ports.form_command.expect_create().never();
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/forms")
            .cookie(session_cookie())
            .set_json(json!({
                "title": "Feedback",
                "questions": [{ "text": "Pick", "type": "multipleChoice", "options": ["Only"] }]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Question 1 needs at least 2 options");
    assert_eq!(body["details"]["code"], "too_few_options");
}

#[rstest]
#[actix_web::test]
async fn create_passes_content_to_port() {
    let user = test_user();
    let form = sample_form(user.id);
    let mut ports = MockPorts::default();
    sign_in_as(&mut ports, &user);
    ports
        .form_command
        .expect_create()
        .withf(|_, content| {
            content.title == "Feedback"
                && content.description.is_none()
                && content.published
                && content.questions.len() == 1
        })
        .return_once(move |_, _| Ok(form));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/forms")
            .cookie(session_cookie())
            .set_json(valid_payload())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["title"], "Feedback");
    assert_eq!(body["responses"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn anonymous_view_passes_no_viewer() {
    let form = sample_form(UserId::random());
    let form_id = form.id;
    let mut ports = MockPorts::default();
    ports
        .form_query
        .expect_view()
        .withf(move |id, viewer| *id == form_id && viewer.is_none())
        .return_once(move |_, _| {
            Ok(FormDetail {
                form,
                responses: Vec::new(),
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/forms/{form_id}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("cache-control").is_none());
}

#[rstest]
#[case(Error::unauthorized("Not authenticated"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("Not authorized"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Form not found"), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn view_propagates_visibility_errors(#[case] error: Error, #[case] status: StatusCode) {
    let mut ports = MockPorts::default();
    ports
        .form_query
        .expect_view()
        .return_once(move |_, _| Err(error));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/forms/{}", FormId::random()))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), status);
}

#[rstest]
#[case("not-a-uuid")]
#[case("clx123abc")]
#[actix_web::test]
async fn unparseable_form_id_is_not_found(#[case] raw: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/forms/{raw}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "Form not found");
}

#[rstest]
#[actix_web::test]
async fn replace_by_non_owner_is_forbidden() {
    let user = test_user();
    let mut ports = MockPorts::default();
    sign_in_as(&mut ports, &user);
    ports
        .form_command
        .expect_replace()
        .return_once(|_, _, _| Err(Error::forbidden("Not authorized")));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/forms/{}", FormId::random()))
            .cookie(session_cookie())
            .set_json(valid_payload())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn delete_acknowledges() {
    let user = test_user();
    let form_id = FormId::random();
    let mut ports = MockPorts::default();
    sign_in_as(&mut ports, &user);
    ports
        .form_command
        .expect_delete()
        .withf(move |_, id| *id == form_id)
        .times(1)
        .return_once(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/forms/{form_id}"))
            .cookie(session_cookie())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "success": true }));
}
