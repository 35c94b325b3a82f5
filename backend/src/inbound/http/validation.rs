//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, FormValidationError, LoginValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidEmail,
    EmptyPassword,
    NameTooLong,
    InvalidQuestionType,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::EmptyPassword => "empty_password",
            ErrorCode::NameTooLong => "name_too_long",
            ErrorCode::InvalidQuestionType => "invalid_question_type",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: &str, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code,
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Parse a UUID-backed identifier from a path segment.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn invalid_question_type_error(index: usize, value: &str) -> Error {
    Error::invalid_request(format!("Unknown question type: {value}")).with_details(json!({
        "field": "type",
        "index": index,
        "value": value,
        "code": ErrorCode::InvalidQuestionType.as_str(),
    }))
}

/// Map credential and profile validation failures to `400` responses.
pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::InvalidEmail => ("email", ErrorCode::InvalidEmail),
        LoginValidationError::EmptyPassword => ("password", ErrorCode::EmptyPassword),
        LoginValidationError::NameTooLong { .. } => ("name", ErrorCode::NameTooLong),
    };
    ValidationError::new(field, err.to_string()).with_code(code.as_str())
}

/// Map draft validation failures to `400` responses. `index` is the 0-based
/// question position.
pub(crate) fn form_validation_error(err: FormValidationError) -> Error {
    let message = err.to_string();
    match err {
        FormValidationError::MissingTitle => {
            ValidationError::new("title", message).with_code(err.code())
        }
        FormValidationError::NoQuestions => {
            ValidationError::new("questions", message).with_code(err.code())
        }
        FormValidationError::MissingQuestionText { question } => {
            ValidationError::new("text", message).with_index(err.code(), question - 1)
        }
        FormValidationError::TooFewOptions { question } => {
            ValidationError::new("options", message).with_index(err.code(), question - 1)
        }
        FormValidationError::EmptyOption { question, option } => {
            Error::invalid_request(message).with_details(json!({
                "field": "options",
                "index": question - 1,
                "option": option - 1,
                "code": err.code(),
            }))
        }
    }
}
