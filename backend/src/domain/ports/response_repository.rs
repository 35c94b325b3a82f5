//! Port abstraction for response persistence adapters.

use async_trait::async_trait;

use crate::domain::FormResponse;

use super::define_port_error;

define_port_error! {
    /// Errors raised by response persistence adapters.
    pub enum ResponseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "response repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "response repository query failed: {message}",
        /// The form was deleted before the response could be stored.
        FormNotFound { form_id: String } => "form {form_id} does not exist",
    }
}

/// Persistence port for submitted responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Store the response and all its answers atomically.
    async fn insert(&self, response: &FormResponse) -> Result<(), ResponseRepositoryError>;
}
