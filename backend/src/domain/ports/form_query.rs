//! Driving port for reading forms.

use async_trait::async_trait;

use crate::domain::{Error, Form, FormDetail, FormId, UserId};

/// Form reads for owners and public visitors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormQuery: Send + Sync {
    /// Forms owned by `owner`, most recently updated first, without responses.
    async fn list_owned(&self, owner: &UserId) -> Result<Vec<Form>, Error>;

    /// Fetch a form for display.
    ///
    /// Published forms are visible to anyone. Unpublished forms need a viewer
    /// (`401` otherwise) who owns the form (`403` otherwise). Responses are
    /// only included for the owner.
    async fn view(&self, form_id: &FormId, viewer: Option<UserId>) -> Result<FormDetail, Error>;

    /// Owner-only: the form with all responses, newest first.
    async fn responses(&self, owner: &UserId, form_id: &FormId) -> Result<FormDetail, Error>;
}
