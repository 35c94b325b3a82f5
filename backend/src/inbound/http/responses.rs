//! Response collection handlers.
//!
//! ```text
//! GET  /api/forms/{id}/responses
//! POST /api/forms/{id}/responses {"answers":[{"questionId":"...","value":"Ada"}]}
//! ```

use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::forms::{lookup_form_id, parse_form_id};
use crate::inbound::http::forms_dto::{FormDto, FormPath, ResponseDto, SubmitRequest};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const NOT_ACCEPTING: &str = "Form not found or not published";

/// Fetch a form with all of its responses, newest first. Owner only.
#[utoipa::path(
    get,
    path = "/api/forms/{id}/responses",
    params(("id" = String, Path, description = "Form identifier")),
    responses(
        (status = 200, description = "Form with responses", body = FormDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["responses"],
    operation_id = "listResponses"
)]
#[get("/forms/{id}/responses")]
pub async fn list_responses(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormPath>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let form_id = parse_form_id(&path.id)?;
    let detail = state.form_query.responses(&owner, &form_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(FormDto::from(detail)))
}

/// Submit an anonymous response to a published form.
///
/// The whole submission is rejected when a required question has no
/// non-blank answer; nothing is stored in that case.
#[utoipa::path(
    post,
    path = "/api/forms/{id}/responses",
    params(("id" = String, Path, description = "Form identifier")),
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Stored response", body = ResponseDto),
        (status = 400, description = "Missing required answer or unknown question", body = Error),
        (status = 404, description = "Form not found or not published", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["responses"],
    operation_id = "submitResponse",
    security([])
)]
#[post("/forms/{id}/responses")]
pub async fn submit_response(
    state: web::Data<HttpState>,
    path: web::Path<FormPath>,
    payload: web::Json<SubmitRequest>,
) -> ApiResult<web::Json<ResponseDto>> {
    let form_id = lookup_form_id(&path.id, NOT_ACCEPTING)?;
    let response = state
        .responses
        .submit(&form_id, payload.into_inner().into_inputs())
        .await?;
    info!(form_id = %form_id, response_id = %response.id, "response recorded");
    Ok(web::Json(ResponseDto::from(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Answer, AnswerId, FormDetail, FormId, FormResponse, QuestionId, UserId,
    };
    use crate::inbound::http::test_utils::{
        MockPorts, sample_form, session_cookie, sign_in_as, test_user,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
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
                .service(list_responses)
                .service(submit_response),
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn submission_forwards_answers_without_session() {
        let form_id = FormId::random();
        let question_id = QuestionId::random();
        let mut ports = MockPorts::default();
        ports
            .responses
            .expect_submit()
            .withf(move |id, answers| {
                *id == form_id
                    && answers.len() == 1
                    && answers[0].question_id == question_id.to_string()
                    && answers[0].value == "Ada"
            })
            .return_once(move |_, _| {
                Ok(FormResponse {
                    id: crate::domain::ResponseId::random(),
                    form_id,
                    created_at: Utc::now(),
                    answers: vec![Answer {
                        id: AnswerId::random(),
                        question_id,
                        value: "Ada".into(),
                    }],
                })
            });
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/forms/{form_id}/responses"))
                .set_json(json!({ "answers": [{ "questionId": question_id.to_string(), "value": "Ada" }] }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["answers"][0]["questionId"], question_id.to_string());
        assert_eq!(body["answers"][0]["value"], "Ada");
    }

    #[rstest]
    #[case(Error::invalid_request("Question \"Name\" is required"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("Form not found or not published"), StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn submission_errors_are_mapped(#[case] error: Error, #[case] status: StatusCode) {
        let mut ports = MockPorts::default();
        ports
            .responses
            .expect_submit()
            .return_once(move |_, _| Err(error));
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/forms/{}/responses", FormId::random()))
                .set_json(json!({ "answers": [] }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), status);
    }

    #[rstest]
    #[case("clx123abc")]
    #[case("not-a-uuid")]
    #[actix_web::test]
    async fn unknown_id_shapes_are_not_accepting(#[case] raw: &str) {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/forms/{raw}/responses"))
                .set_json(json!({ "answers": [] }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], NOT_ACCEPTING);
    }

    #[rstest]
    #[actix_web::test]
    async fn owner_listing_requires_session() {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/forms/{}/responses", FormId::random()))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn owner_listing_includes_responses() {
        let user = test_user();
        let form = sample_form(user.id);
        let form_id = form.id;
        let question_id = form.questions[0].id;
        let mut ports = MockPorts::default();
        sign_in_as(&mut ports, &user);
        let owner: UserId = user.id;
        ports
            .form_query
            .expect_responses()
            .withf(move |who, id| *who == owner && *id == form_id)
            .return_once(move |_, _| {
                Ok(FormDetail {
                    responses: vec![FormResponse {
                        id: crate::domain::ResponseId::random(),
                        form_id,
                        created_at: Utc::now(),
                        answers: vec![Answer {
                            id: AnswerId::random(),
                            question_id,
                            value: "Grace".into(),
                        }],
                    }],
                    form,
                })
            });
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/forms/{form_id}/responses"))
                .cookie(session_cookie())
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["responses"][0]["answers"][0]["value"], "Grace");
    }
}
