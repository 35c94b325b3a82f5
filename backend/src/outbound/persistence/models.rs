//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{answers, forms, questions, responses, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: Option<&'a str>,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Changeset for profile edits. `treat_none_as_null` so clearing the name
/// persists.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the forms table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = forms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FormRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new forms.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = forms)]
pub(crate) struct NewFormRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset replacing a form's editable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = forms)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct FormUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub published: bool,
    pub updated_at: DateTime<Utc>,
}

/// Question row; also used for inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub question_text: String,
    pub question_type: String,
    pub required: bool,
    pub options: Option<Vec<String>>,
    pub position: i32,
}

/// Response row; also used for inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = responses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ResponseRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Answer row; also used for inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = answers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnswerRow {
    pub id: Uuid,
    pub response_id: Uuid,
    pub question_id: Uuid,
    pub value: String,
}
