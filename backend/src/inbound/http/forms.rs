//! Form authoring and viewing handlers.
//!
//! ```text
//! GET    /api/forms
//! POST   /api/forms        {"title":"Feedback","questions":[...]}
//! GET    /api/forms/{id}
//! PUT    /api/forms/{id}   {"title":"Feedback","published":false,"questions":[...]}
//! DELETE /api/forms/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Error, FormId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::SuccessResponse;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::forms_dto::{FormDto, FormPath, FormRequest};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const FORM_NOT_FOUND: &str = "Form not found";

/// Parse a form id path segment. A segment that cannot name a stored form
/// answers `404` with `missing`, like any other unknown form.
pub(crate) fn lookup_form_id(raw: &str, missing: &str) -> Result<FormId, Error> {
    raw.parse().map_err(|_| Error::not_found(missing))
}

pub(crate) fn parse_form_id(raw: &str) -> Result<FormId, Error> {
    lookup_form_id(raw, FORM_NOT_FOUND)
}

/// List the caller's forms, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/forms",
    responses(
        (status = 200, description = "Owned forms", body = [FormDto]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["forms"],
    operation_id = "listForms"
)]
#[get("/forms")]
pub async fn list_forms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let forms = state.form_query.list_owned(&owner).await?;
    let body: Vec<FormDto> = forms.into_iter().map(FormDto::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Create a form owned by the caller.
#[utoipa::path(
    post,
    path = "/api/forms",
    request_body = FormRequest,
    responses(
        (status = 200, description = "Created form", body = FormDto),
        (status = 400, description = "Invalid form definition", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["forms"],
    operation_id = "createForm"
)]
#[post("/forms")]
pub async fn create_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FormRequest>,
) -> ApiResult<web::Json<FormDto>> {
    let owner = session.require_user_id()?;
    let content = payload.into_inner().into_content()?;
    let form = state.form_command.create(&owner, &content).await?;
    Ok(web::Json(FormDto::from(form)))
}

/// Fetch a form. Published forms are public; drafts are visible to their
/// owner only. Responses are included for the owner.
#[utoipa::path(
    get,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form identifier")),
    responses(
        (status = 200, description = "Form", body = FormDto),
        (status = 401, description = "Draft form and no session", body = Error),
        (status = 403, description = "Draft form owned by someone else", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["forms"],
    operation_id = "getForm",
    security([], ("SessionCookie" = []))
)]
#[get("/forms/{id}")]
pub async fn get_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormPath>,
) -> ApiResult<HttpResponse> {
    let form_id = parse_form_id(&path.id)?;
    let detail = state.form_query.view(&form_id, session.user_id()).await?;
    let mut response = HttpResponse::Ok();
    if session.user_id().is_some() {
        response.insert_header(private_no_cache_header());
    }
    Ok(response.json(FormDto::from(detail)))
}

/// Replace title, description, publication flag and questions.
#[utoipa::path(
    put,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form identifier")),
    request_body = FormRequest,
    responses(
        (status = 200, description = "Updated form", body = FormDto),
        (status = 400, description = "Invalid form definition", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["forms"],
    operation_id = "replaceForm"
)]
#[put("/forms/{id}")]
pub async fn replace_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormPath>,
    payload: web::Json<FormRequest>,
) -> ApiResult<web::Json<FormDto>> {
    let owner = session.require_user_id()?;
    let form_id = parse_form_id(&path.id)?;
    let content = payload.into_inner().into_content()?;
    let detail = state
        .form_command
        .replace(&owner, &form_id, &content)
        .await?;
    Ok(web::Json(FormDto::from(detail)))
}

/// Delete a form with its questions and responses.
#[utoipa::path(
    delete,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form identifier")),
    responses(
        (status = 200, description = "Form deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["forms"],
    operation_id = "deleteForm"
)]
#[delete("/forms/{id}")]
pub async fn delete_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormPath>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let owner = session.require_user_id()?;
    let form_id = parse_form_id(&path.id)?;
    state.form_command.delete(&owner, &form_id).await?;
    Ok(web::Json(SuccessResponse::ok()))
}

#[cfg(test)]
#[path = "forms_tests.rs"]
mod tests;
