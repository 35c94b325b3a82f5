//! Result views over a form's responses. Owner only.
//!
//! ```text
//! GET /api/forms/{id}/results/table
//! GET /api/forms/{id}/results/charts/{questionId}
//! GET /api/forms/{id}/results/export.csv
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, QuestionId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{no_store_header, private_no_cache_header};
use crate::inbound::http::forms::parse_form_id;
use crate::inbound::http::forms_dto::{ChartPath, ChartSliceDto, FormPath, ResultsTableDto};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// One row per response with a cell per question; `-` marks missing answers.
#[utoipa::path(
    get,
    path = "/api/forms/{id}/results/table",
    params(("id" = String, Path, description = "Form identifier")),
    responses(
        (status = 200, description = "Results table", body = ResultsTableDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["results"],
    operation_id = "resultsTable"
)]
#[get("/forms/{id}/results/table")]
pub async fn results_table(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormPath>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let form_id = parse_form_id(&path.id)?;
    let table = state.form_results.table(&owner, &form_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ResultsTableDto::from(table)))
}

/// Answer frequencies for a choice question, in first-seen order.
#[utoipa::path(
    get,
    path = "/api/forms/{id}/results/charts/{questionId}",
    params(
        ("id" = String, Path, description = "Form identifier"),
        ("questionId" = String, Path, description = "Choice question identifier")
    ),
    responses(
        (status = 200, description = "Chart slices", body = [ChartSliceDto]),
        (status = 400, description = "Malformed question identifier or text question", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Form or question not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["results"],
    operation_id = "resultsChart"
)]
#[get("/forms/{id}/results/charts/{questionId}")]
pub async fn results_chart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ChartPath>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let form_id = parse_form_id(&path.id)?;
    let question_id: QuestionId = parse_id(&path.question_id, FieldName::new("questionId"))?;
    let slices = state
        .form_results
        .chart(&owner, &form_id, &question_id)
        .await?;
    let body: Vec<ChartSliceDto> = slices.into_iter().map(ChartSliceDto::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Download every response as CSV.
#[utoipa::path(
    get,
    path = "/api/forms/{id}/results/export.csv",
    params(("id" = String, Path, description = "Form identifier")),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String,
            headers(("Content-Disposition" = String, description = "Attachment file name"))),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["results"],
    operation_id = "exportCsv"
)]
#[get("/forms/{id}/results/export.csv")]
pub async fn export_csv(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormPath>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let form_id = parse_form_id(&path.id)?;
    let export = state.form_results.export_csv(&owner, &form_id).await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(export.file_name)],
    };
    Ok(HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header(disposition)
        .insert_header(no_store_header())
        .body(export.body))
}
