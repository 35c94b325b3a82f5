//! PostgreSQL-backed `ResponseRepository` implementation.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::FormResponse;
use crate::domain::ports::{ResponseRepository, ResponseRepositoryError};

use super::diesel_helpers::{foreign_key_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{AnswerRow, ResponseRow};
use super::pool::DbPool;
use super::schema::{answers, responses};

/// Diesel-backed implementation of the [`ResponseRepository`] port.
#[derive(Clone)]
pub struct DieselResponseRepository {
    pool: DbPool,
}

impl DieselResponseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, form_id: &str) -> ResponseRepositoryError {
    if foreign_key_violation(&error).is_some() {
        return ResponseRepositoryError::form_not_found(form_id);
    }
    map_basic_diesel_error(
        error,
        ResponseRepositoryError::query,
        ResponseRepositoryError::connection,
    )
}

#[async_trait]
impl ResponseRepository for DieselResponseRepository {
    async fn insert(&self, response: &FormResponse) -> Result<(), ResponseRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ResponseRepositoryError::connection))?;
        let response_row = ResponseRow {
            id: *response.id.as_uuid(),
            form_id: *response.form_id.as_uuid(),
            created_at: response.created_at,
        };
        let answer_rows: Vec<AnswerRow> = response
            .answers
            .iter()
            .map(|answer| AnswerRow {
                id: *answer.id.as_uuid(),
                response_id: response_row.id,
                question_id: *answer.question_id.as_uuid(),
                value: answer.value.clone(),
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(responses::table)
                    .values(&response_row)
                    .execute(conn)
                    .await?;
                if !answer_rows.is_empty() {
                    diesel::insert_into(answers::table)
                        .values(&answer_rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, &response.form_id.to_string()))
    }
}
