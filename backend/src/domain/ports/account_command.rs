//! Driving port for changes to the signed-in account.

use async_trait::async_trait;

use crate::domain::{Error, PasswordChange, User, UserId, UserProfile};

/// Mutations of the caller's own account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Update name and e-mail.
    async fn update_profile(&self, user_id: &UserId, profile: &UserProfile)
    -> Result<User, Error>;

    /// Rotate the password after checking the current one.
    async fn change_password(&self, user_id: &UserId, change: &PasswordChange)
    -> Result<(), Error>;

    /// Delete the account and everything it owns.
    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error>;
}
