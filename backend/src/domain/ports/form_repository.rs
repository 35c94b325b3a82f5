//! Port abstraction for form persistence adapters.

use async_trait::async_trait;

use crate::domain::{Form, FormContent, FormDetail, FormId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by form persistence adapters.
    pub enum FormRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "form repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "form repository query failed: {message}",
        /// The owning account no longer exists.
        OwnerNotFound { owner_id: String } => "form owner {owner_id} does not exist",
    }
}

/// Form to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForm {
    /// Identifier to assign.
    pub id: FormId,
    /// Creating account.
    pub owner_id: UserId,
    /// Validated definition.
    pub content: FormContent,
}

/// Persistence port for forms and their question sets.
///
/// Adapters assign question ids with [`crate::domain::plan_question_set`] and
/// stamp `created_at`/`updated_at` themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Insert the form and all its questions atomically.
    async fn insert(&self, form: &NewForm) -> Result<Form, FormRepositoryError>;

    /// Forms owned by `owner`, most recently updated first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Form>, FormRepositoryError>;

    /// Form with questions and response count.
    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, FormRepositoryError>;

    /// Form plus all responses, newest first.
    async fn find_detail(&self, id: &FormId) -> Result<Option<FormDetail>, FormRepositoryError>;

    /// Replace the definition of a form owned by `owner`.
    ///
    /// Deleting the old questions, inserting the new set and updating the form
    /// row happen in one transaction. Returns `None` when no such form exists
    /// for that owner.
    async fn replace(
        &self,
        id: &FormId,
        owner: &UserId,
        content: &FormContent,
    ) -> Result<Option<Form>, FormRepositoryError>;

    /// Delete a form owned by `owner` with its questions and responses.
    async fn delete(&self, id: &FormId, owner: &UserId) -> Result<bool, FormRepositoryError>;
}
