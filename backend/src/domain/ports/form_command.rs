//! Driving port for authoring forms.

use async_trait::async_trait;

use crate::domain::{Error, Form, FormContent, FormDetail, FormId, UserId};

/// Owner-only form mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormCommand: Send + Sync {
    /// Create a form owned by `owner`.
    async fn create(&self, owner: &UserId, content: &FormContent) -> Result<Form, Error>;

    /// Replace title, description, publication flag and the whole question
    /// set. `404` if absent, `403` if `owner` does not own it.
    async fn replace(
        &self,
        owner: &UserId,
        form_id: &FormId,
        content: &FormContent,
    ) -> Result<FormDetail, Error>;

    /// Delete a form with its questions and responses.
    async fn delete(&self, owner: &UserId, form_id: &FormId) -> Result<(), Error>;
}
