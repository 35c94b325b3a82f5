//! Port abstraction for account persistence adapters.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, User, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user persistence adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Account record including its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Public identity.
    pub user: User,
    /// Salted password hash.
    pub password_hash: PasswordHash,
}

/// Persistence port for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account; fails with `DuplicateEmail` if the address is taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Look an account up by exact e-mail address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Look an account up by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Overwrite name and e-mail. Returns `None` if the account is gone.
    async fn update_profile(
        &self,
        id: &UserId,
        profile: &UserProfile,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Replace the stored hash. Returns `false` if the account is gone.
    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError>;

    /// Delete the account with all its forms, questions, responses and
    /// answers in one atomic step. Returns `false` if nothing was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
