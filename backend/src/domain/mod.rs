//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the rules that govern them, and the services that
//! drive use-cases through ports. Nothing here depends on actix or diesel.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User / EmailAddress / UserName — account identity.
//! - Form / Question / FormResponse — the form aggregate.
//! - FormEditState — authoring state machine and validation.
//! - table_projection / chart_distribution / csv_export — result views.

pub mod aggregation;
pub mod auth;
pub mod error;
pub mod form;
pub mod form_edit;
pub mod ports;
pub mod submission;
pub mod trace_id;
pub mod user;

mod account_service;
mod form_service;
mod ids;
mod submission_service;

pub use self::account_service::AccountService;
pub use self::aggregation::{
    CSV_PLACEHOLDER, ChartError, ChartSlice, CsvExport, RESPONSE_ID_COLUMN, ResponseRow,
    ResponseTable, TABLE_PLACEHOLDER, TIMESTAMP_COLUMN, chart_distribution, csv_export,
    csv_file_name, format_timestamp, table_projection,
};
pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordChange, PasswordHash, SESSION_TTL_SECS,
    SessionClaims, SignupDetails, session_ttl,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::form::{
    Answer, AnswerId, Form, FormContent, FormDetail, FormId, FormResponse, Question,
    QuestionContent, QuestionId, QuestionType, ResponseId, UnknownQuestionType, plan_question_set,
};
pub use self::form_edit::{
    DraftQuestion, EditError, FormEditState, FormValidationError, MIN_CHOICE_OPTIONS,
    QuestionField,
};
pub use self::form_service::FormService;
pub use self::submission::{AnswerInput, SubmissionError, prepare_answers};
pub use self::submission_service::ResponseSubmissionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, USER_NAME_MAX, User, UserId, UserName, UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use formly::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
