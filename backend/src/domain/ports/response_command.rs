//! Driving port for anonymous submissions.

use async_trait::async_trait;

use crate::domain::{AnswerInput, Error, FormId, FormResponse};

/// Public response submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseCommand: Send + Sync {
    /// Validate and store a response to a published form.
    async fn submit(&self, form_id: &FormId, answers: Vec<AnswerInput>)
    -> Result<FormResponse, Error>;
}
