//! Driving port for signing in and registering accounts.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignupDetails, User};

/// Domain use-case port for credential checks.
///
/// Session tokens are issued by the inbound adapter once this port has
/// established who the caller is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate credentials. Unknown addresses and wrong passwords are
    /// indistinguishable to the caller.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Create an account.
    async fn sign_up(&self, details: &SignupDetails) -> Result<User, Error>;
}
