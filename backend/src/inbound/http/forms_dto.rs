//! Form DTOs and parsing helpers.
//!
//! Incoming form definitions are run through [`FormEditState`] so the API
//! applies the same validation as the editor before anything is stored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Answer, AnswerInput, ChartSlice, DraftQuestion, Error, Form, FormContent, FormDetail,
    FormEditState, FormResponse, Question, QuestionId, QuestionType, ResponseRow, ResponseTable,
    format_timestamp,
};
use crate::inbound::http::validation::{form_validation_error, invalid_question_type_error};

#[derive(Debug, Deserialize)]
pub(super) struct FormPath {
    pub(super) id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChartPath {
    pub(super) id: String,
    pub(super) question_id: String,
}

/// Question definition inside a create or replace request.
///
/// `id` is kept only when it names a question already on the form; any other
/// value (including client-generated placeholders) yields a new question.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    /// Existing question id to keep; anything else creates a new question.
    #[serde(default)]
    pub id: Option<String>,
    /// Prompt shown to respondents.
    #[serde(default)]
    pub text: String,
    /// One of `text`, `multipleChoice`, `checkbox` or `dropdown`.
    #[serde(rename = "type")]
    #[schema(example = "multipleChoice")]
    pub question_type: String,
    /// Whether a non-blank answer is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Choices for choice questions; ignored for text questions.
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

impl QuestionRequest {
    fn into_draft(self, index: usize) -> Result<DraftQuestion, Error> {
        let question_type: QuestionType = self
            .question_type
            .parse()
            .map_err(|_| invalid_question_type_error(index, &self.question_type))?;
        let id = self
            .id
            .as_deref()
            .and_then(|raw| raw.parse::<QuestionId>().ok())
            .unwrap_or_else(QuestionId::random);
        Ok(DraftQuestion {
            id,
            text: self.text,
            question_type,
            required: self.required,
            options: self.options,
        })
    }
}

/// Request payload for `POST /api/forms` and `PUT /api/forms/{id}`.
///
/// `published` defaults to `true` when omitted.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormRequest {
    /// Form title; must not be blank.
    #[serde(default)]
    pub title: String,
    /// Optional description shown above the questions.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the form accepts public submissions.
    #[serde(default)]
    pub published: Option<bool>,
    /// Questions in display order; at least one.
    #[serde(default)]
    #[schema(max_items = 500)]
    pub questions: Vec<QuestionRequest>,
}

impl FormRequest {
    /// Validate the payload and convert it into storable content.
    pub(crate) fn into_content(self) -> Result<FormContent, Error> {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| question.into_draft(index))
            .collect::<Result<Vec<_>, _>>()?;
        FormEditState::from_parts(
            self.title,
            self.description,
            self.published.unwrap_or(true),
            questions,
        )
        .to_content()
        .map_err(form_validation_error)
    }
}

/// One answer inside a public submission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// Question being answered.
    pub question_id: String,
    /// Answer text; checkbox answers join choices with `, `.
    #[serde(default)]
    pub value: String,
}

/// Request payload for `POST /api/forms/{id}/responses`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Answers in any order, at most one per question.
    #[serde(default)]
    pub answers: Vec<AnswerRequest>,
}

impl SubmitRequest {
    pub(crate) fn into_inputs(self) -> Vec<AnswerInput> {
        self.answers
            .into_iter()
            .map(|answer| AnswerInput::new(answer.question_id, answer.value))
            .collect()
    }
}

/// Response payload for a question.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    /// Question identifier.
    pub id: String,
    /// Prompt shown to respondents.
    pub text: String,
    /// Question type in wire spelling.
    #[serde(rename = "type")]
    pub question_type: String,
    /// Whether a non-blank answer is mandatory.
    pub required: bool,
    /// Choices for choice questions.
    pub options: Option<Vec<String>>,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.to_string(),
            text: question.text,
            question_type: question.question_type.as_str().to_owned(),
            required: question.required,
            options: question.options,
        }
    }
}

/// Response payload for a stored answer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    /// Answer identifier.
    pub id: String,
    /// Answer text.
    pub value: String,
    /// Question this answer belongs to.
    pub question_id: String,
}

impl From<Answer> for AnswerDto {
    fn from(answer: Answer) -> Self {
        Self {
            id: answer.id.to_string(),
            value: answer.value,
            question_id: answer.question_id.to_string(),
        }
    }
}

/// Response payload for a submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto {
    /// Response identifier.
    pub id: String,
    /// Submission time, RFC 3339 in UTC.
    #[schema(example = "2024-05-01T12:00:00.000Z")]
    pub created_at: String,
    /// Stored answers.
    pub answers: Vec<AnswerDto>,
}

impl From<FormResponse> for ResponseDto {
    fn from(response: FormResponse) -> Self {
        Self {
            id: response.id.to_string(),
            created_at: format_timestamp(response.created_at),
            answers: response.answers.into_iter().map(AnswerDto::from).collect(),
        }
    }
}

/// Response payload for a form. `responses` is empty unless the caller owns
/// the form and asked for them.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDto {
    /// Form identifier.
    pub id: String,
    /// Form title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Whether the form accepts public submissions.
    pub published: bool,
    /// Creation time, RFC 3339 in UTC.
    pub created_at: String,
    /// Last modification time, RFC 3339 in UTC.
    pub updated_at: String,
    /// Number of stored responses.
    pub response_count: usize,
    /// Questions in display order.
    pub questions: Vec<QuestionDto>,
    /// Responses, newest first; owner views only.
    pub responses: Vec<ResponseDto>,
}

impl From<Form> for FormDto {
    fn from(form: Form) -> Self {
        Self {
            id: form.id.to_string(),
            title: form.title,
            description: form.description,
            published: form.published,
            created_at: format_timestamp(form.created_at),
            updated_at: format_timestamp(form.updated_at),
            response_count: form.response_count,
            questions: form.questions.into_iter().map(QuestionDto::from).collect(),
            responses: Vec::new(),
        }
    }
}

impl From<FormDetail> for FormDto {
    fn from(detail: FormDetail) -> Self {
        let mut dto = Self::from(detail.form);
        dto.responses = detail.responses.into_iter().map(ResponseDto::from).collect();
        dto
    }
}

/// One results-table row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultsRowDto {
    /// Response this row shows.
    pub response_id: String,
    /// Submission time, RFC 3339 in UTC.
    pub submitted_at: String,
    /// One cell per question; `-` marks a missing answer.
    pub cells: Vec<String>,
}

/// Response payload for `GET /api/forms/{id}/results/table`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultsTableDto {
    /// `Timestamp` followed by each question text.
    pub columns: Vec<String>,
    /// One row per response, newest first.
    pub rows: Vec<ResultsRowDto>,
}

impl From<ResponseRow> for ResultsRowDto {
    fn from(row: ResponseRow) -> Self {
        Self {
            response_id: row.response_id.to_string(),
            submitted_at: format_timestamp(row.submitted_at),
            cells: row.cells,
        }
    }
}

impl From<ResponseTable> for ResultsTableDto {
    fn from(table: ResponseTable) -> Self {
        Self {
            columns: table.columns,
            rows: table.rows.into_iter().map(ResultsRowDto::from).collect(),
        }
    }
}

/// One chart slice.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChartSliceDto {
    /// Choice label.
    #[schema(example = "Red")]
    pub name: String,
    /// Number of responses that picked it.
    #[schema(example = 3)]
    pub value: usize,
}

impl From<ChartSlice> for ChartSliceDto {
    fn from(slice: ChartSlice) -> Self {
        Self {
            name: slice.name,
            value: slice.value,
        }
    }
}
