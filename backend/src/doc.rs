//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, forms,
//!   responses, results, health)
//! - **Schemas**: request/response DTOs plus the domain error envelope
//!   ([`Error`], [`ErrorCode`])
//! - **Security**: the `auth-token` session cookie
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::auth::{
    AccountResponse, ChangePasswordRequest, SessionResponse, SignInRequest, SignUpRequest,
    SuccessResponse, UpdateProfileRequest,
};
use crate::inbound::http::forms_dto::{
    AnswerDto, AnswerRequest, ChartSliceDto, FormDto, FormRequest, QuestionDto, QuestionRequest,
    ResponseDto, ResultsRowDto, ResultsTableDto, SubmitRequest,
};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::session::SESSION_COOKIE;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the cookie security scheme in the generated document.
pub const SESSION_SECURITY_SCHEME: &str = "SessionCookie";

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            SESSION_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Signed session token issued by POST /api/auth/signin or /api/auth/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Formly API",
        description = "Accounts, form authoring, public submissions and result views."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::auth::update_profile,
        crate::inbound::http::auth::change_password,
        crate::inbound::http::auth::delete_account,
        crate::inbound::http::forms::list_forms,
        crate::inbound::http::forms::create_form,
        crate::inbound::http::forms::get_form,
        crate::inbound::http::forms::replace_form,
        crate::inbound::http::forms::delete_form,
        crate::inbound::http::responses::list_responses,
        crate::inbound::http::responses::submit_response,
        crate::inbound::http::results::results_table,
        crate::inbound::http::results::results_chart,
        crate::inbound::http::results::export_csv,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignInRequest,
        SignUpRequest,
        UpdateProfileRequest,
        ChangePasswordRequest,
        AccountResponse,
        SessionResponse,
        SuccessResponse,
        FormRequest,
        QuestionRequest,
        SubmitRequest,
        AnswerRequest,
        FormDto,
        QuestionDto,
        ResponseDto,
        AnswerDto,
        ResultsTableDto,
        ResultsRowDto,
        ChartSliceDto,
    )),
    tags(
        (name = "auth", description = "Accounts and sessions"),
        (name = "forms", description = "Form authoring and viewing"),
        (name = "responses", description = "Public submissions and owner listings"),
        (name = "results", description = "Aggregated result views and CSV export"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
