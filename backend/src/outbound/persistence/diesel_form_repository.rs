//! PostgreSQL-backed `FormRepository` implementation.
//!
//! Forms are stored across `forms` and `questions`; response counts and
//! response detail are read from `responses` and `answers`. Writes that touch
//! more than one table run in a single transaction, and multi-statement reads
//! run in a read-only repeatable-read transaction so a concurrent replace is
//! seen either entirely or not at all.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{FormRepository, FormRepositoryError, NewForm};
use crate::domain::{Form, FormContent, FormDetail, FormId, QuestionId, UserId, plan_question_set};

use super::diesel_helpers::{
    assemble_forms, assemble_responses, foreign_key_violation, map_basic_diesel_error,
    map_basic_pool_error, questions_to_rows,
};
use super::models::{AnswerRow, FormRow, FormUpdate, NewFormRow, QuestionRow, ResponseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{answers, forms, questions, responses};

/// Diesel-backed implementation of the [`FormRepository`] port.
#[derive(Clone)]
pub struct DieselFormRepository {
    pool: DbPool,
}

impl DieselFormRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FormRepositoryError {
    map_basic_pool_error(error, FormRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FormRepositoryError {
    map_basic_diesel_error(
        error,
        FormRepositoryError::query,
        FormRepositoryError::connection,
    )
}

/// Error type threaded through transactions.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Rows(String),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_read_error(error: TxError) -> FormRepositoryError {
    match error {
        TxError::Diesel(err) => map_diesel_error(err),
        TxError::Rows(message) => FormRepositoryError::query(message),
    }
}

fn map_tx_error(error: TxError, owner_id: &UserId) -> FormRepositoryError {
    match error {
        TxError::Diesel(err) if foreign_key_violation(&err).is_some() => {
            FormRepositoryError::owner_not_found(owner_id.to_string())
        }
        other => map_read_error(other),
    }
}

async fn load_forms(
    conn: &mut AsyncPgConnection,
    form_rows: Vec<FormRow>,
) -> Result<Vec<Form>, TxError> {
    if form_rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = form_rows.iter().map(|row| row.id).collect();

    let question_rows: Vec<QuestionRow> = questions::table
        .filter(questions::form_id.eq_any(ids.clone()))
        .select(QuestionRow::as_select())
        .order_by((questions::form_id, questions::position))
        .load(conn)
        .await?;

    let counts: HashMap<Uuid, i64> = responses::table
        .filter(responses::form_id.eq_any(ids))
        .group_by(responses::form_id)
        .select((responses::form_id, diesel::dsl::count_star()))
        .load::<(Uuid, i64)>(conn)
        .await?
        .into_iter()
        .collect();

    assemble_forms(form_rows, question_rows, &counts).map_err(TxError::Rows)
}

async fn load_form(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Option<Form>, TxError> {
    let row: Option<FormRow> = forms::table
        .find(id)
        .select(FormRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(load_forms(conn, vec![row]).await?.into_iter().next())
}

async fn load_detail(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Option<FormDetail>, TxError> {
    let Some(form) = load_form(conn, id).await? else {
        return Ok(None);
    };

    let response_rows: Vec<ResponseRow> = responses::table
        .filter(responses::form_id.eq(id))
        .select(ResponseRow::as_select())
        .order_by(responses::created_at.desc())
        .load(conn)
        .await?;
    let response_ids: Vec<Uuid> = response_rows.iter().map(|row| row.id).collect();
    let answer_rows: Vec<AnswerRow> = if response_ids.is_empty() {
        Vec::new()
    } else {
        answers::table
            .filter(answers::response_id.eq_any(response_ids))
            .select(AnswerRow::as_select())
            .load(conn)
            .await?
    };

    Ok(Some(FormDetail {
        form,
        responses: assemble_responses(response_rows, answer_rows),
    }))
}

#[async_trait]
impl FormRepository for DieselFormRepository {
    async fn insert(&self, form: &NewForm) -> Result<Form, FormRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let form_id = *form.id.as_uuid();
        let content = &form.content;
        let question_rows =
            questions_to_rows(form_id, &plan_question_set(&[], &content.questions))
                .map_err(FormRepositoryError::query)?;
        let form_row = NewFormRow {
            id: form_id,
            owner_id: *form.owner_id.as_uuid(),
            title: &content.title,
            description: content.description.as_deref(),
            published: content.published,
            created_at: now,
            updated_at: now,
        };

        let inserted = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    diesel::insert_into(forms::table)
                        .values(&form_row)
                        .execute(conn)
                        .await?;
                    diesel::insert_into(questions::table)
                        .values(&question_rows)
                        .execute(conn)
                        .await?;
                    load_form(conn, form_id).await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_tx_error(err, &form.owner_id))?;

        inserted.ok_or_else(|| FormRepositoryError::query("inserted form vanished"))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Form>, FormRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_id = *owner.as_uuid();
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| {
                async move {
                    let rows: Vec<FormRow> = forms::table
                        .filter(forms::owner_id.eq(owner_id))
                        .select(FormRow::as_select())
                        .order_by(forms::updated_at.desc())
                        .load(conn)
                        .await?;
                    load_forms(conn, rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_read_error)
    }

    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, FormRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let form_id = *id.as_uuid();
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| async move { load_form(conn, form_id).await }.scope_boxed())
            .await
            .map_err(map_read_error)
    }

    async fn find_detail(&self, id: &FormId) -> Result<Option<FormDetail>, FormRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let form_id = *id.as_uuid();
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| async move { load_detail(conn, form_id).await }.scope_boxed())
            .await
            .map_err(map_read_error)
    }

    async fn replace(
        &self,
        id: &FormId,
        owner: &UserId,
        content: &FormContent,
    ) -> Result<Option<Form>, FormRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let form_id = *id.as_uuid();
        let owner_id = *owner.as_uuid();
        let changes = FormUpdate {
            title: &content.title,
            description: content.description.as_deref(),
            published: content.published,
            updated_at: Utc::now(),
        };

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let updated = diesel::update(
                    forms::table
                        .filter(forms::id.eq(form_id))
                        .filter(forms::owner_id.eq(owner_id)),
                )
                .set(&changes)
                .execute(conn)
                .await?;
                if updated == 0 {
                    return Ok(None);
                }

                let previous: Vec<QuestionId> = questions::table
                    .filter(questions::form_id.eq(form_id))
                    .select(questions::id)
                    .load::<Uuid>(conn)
                    .await?
                    .into_iter()
                    .map(QuestionId::from_uuid)
                    .collect();
                let rows =
                    questions_to_rows(form_id, &plan_question_set(&previous, &content.questions))
                        .map_err(TxError::Rows)?;

                diesel::delete(questions::table.filter(questions::form_id.eq(form_id)))
                    .execute(conn)
                    .await?;
                diesel::insert_into(questions::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                load_form(conn, form_id).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_tx_error(err, owner))
    }

    async fn delete(&self, id: &FormId, owner: &UserId) -> Result<bool, FormRepositoryError> {
        // Questions, responses and answers cascade.
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            forms::table
                .filter(forms::id.eq(id.as_uuid()))
                .filter(forms::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
