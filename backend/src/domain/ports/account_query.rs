//! Driving port for reading the signed-in account.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Read access to the caller's own account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Fetch the account; `404` if it has been deleted.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
