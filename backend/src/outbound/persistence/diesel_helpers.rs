//! Shared helpers for Diesel repository implementations.
//!
//! Each repository has its own port error type with `connection` and `query`
//! constructors; these helpers map pool and Diesel failures onto them and
//! convert rows into the form aggregate.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    Answer, AnswerId, Form, FormId, FormResponse, Question, QuestionId, QuestionType, ResponseId,
    UserId,
};

use super::models::{AnswerRow, FormRow, QuestionRow, ResponseRow};
use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Name of the violated constraint if `error` is a foreign key violation.
pub fn foreign_key_violation(error: &diesel::result::Error) -> Option<String> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => Some(
            info.constraint_name()
                .unwrap_or_else(|| info.message())
                .to_owned(),
        ),
        _ => None,
    }
}

/// Whether `error` violates the unique constraint named `constraint`.
pub fn is_unique_violation(error: &diesel::result::Error, constraint: &str) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name().is_none_or(|name| name == constraint)
    )
}

/// Convert a position index into the database column type.
pub fn position_for_db(index: usize) -> Result<i32, String> {
    i32::try_from(index).map_err(|_| format!("question position {index} out of range"))
}

/// Convert a stored count into the domain type.
pub fn count_from_db(count: i64) -> usize {
    usize::try_from(count).unwrap_or_else(|_| {
        warn!(count, "negative row count from database");
        0
    })
}

/// Convert a question row into the domain type.
pub fn row_to_question(row: QuestionRow) -> Result<Question, String> {
    let question_type = row
        .question_type
        .parse::<QuestionType>()
        .map_err(|err| format!("question {}: {err}", row.id))?;
    Ok(Question {
        id: QuestionId::from_uuid(row.id),
        text: row.question_text,
        question_type,
        required: row.required,
        options: row.options,
    })
}

/// Build question rows for `form_id` in display order.
pub fn questions_to_rows(form_id: Uuid, questions: &[Question]) -> Result<Vec<QuestionRow>, String> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            Ok(QuestionRow {
                id: *question.id.as_uuid(),
                form_id,
                question_text: question.text.clone(),
                question_type: question.question_type.as_str().to_owned(),
                required: question.required,
                options: question.options.clone(),
                position: position_for_db(index)?,
            })
        })
        .collect()
}

/// Assemble forms from rows. `questions` must be ordered by position.
pub fn assemble_forms(
    form_rows: Vec<FormRow>,
    question_rows: Vec<QuestionRow>,
    counts: &HashMap<Uuid, i64>,
) -> Result<Vec<Form>, String> {
    let mut by_form: HashMap<Uuid, Vec<Question>> = HashMap::new();
    for row in question_rows {
        let form_id = row.form_id;
        by_form.entry(form_id).or_default().push(row_to_question(row)?);
    }

    Ok(form_rows
        .into_iter()
        .map(|row| Form {
            id: FormId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            title: row.title,
            description: row.description,
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
            questions: by_form.remove(&row.id).unwrap_or_default(),
            response_count: counts.get(&row.id).copied().map_or(0, count_from_db),
        })
        .collect())
}

/// Assemble responses from rows, keeping the order of `response_rows`.
pub fn assemble_responses(
    response_rows: Vec<ResponseRow>,
    answer_rows: Vec<AnswerRow>,
) -> Vec<FormResponse> {
    let mut by_response: HashMap<Uuid, Vec<Answer>> = HashMap::new();
    for row in answer_rows {
        by_response.entry(row.response_id).or_default().push(Answer {
            id: AnswerId::from_uuid(row.id),
            question_id: QuestionId::from_uuid(row.question_id),
            value: row.value,
        });
    }

    response_rows
        .into_iter()
        .map(|row| FormResponse {
            id: ResponseId::from_uuid(row.id),
            form_id: FormId::from_uuid(row.form_id),
            created_at: row.created_at,
            answers: by_response.remove(&row.id).unwrap_or_default(),
        })
        .collect()
}
