//! Account services: sign-in, sign-up and self-service account management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountQuery, LoginService, PasswordHashError, PasswordHasher, UserAccount,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, PasswordChange, PasswordHash, SignupDetails, User, UserId,
    UserProfile,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const USER_NOT_FOUND: &str = "User not found";
/// Password hashed once per service to give unknown emails a hash to check
/// against.
const DECOY_PASSWORD: &str = "formly-decoy-password";

/// Account service implementing [`LoginService`], [`AccountQuery`] and
/// [`AccountCommand`] over a user repository and a password hasher.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    decoy: Arc<OnceCell<PasswordHash>>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => email_taken(),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn email_taken() -> Error {
    Error::invalid_request("User already exists").with_details(json!({
        "field": "email",
        "code": "email_taken",
    }))
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn hash(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(map_hash_error)
    }

    /// Spend the same verification work as a real sign-in so response times
    /// do not reveal whether an email is registered.
    async fn verify_decoy(&self, password: &str) -> Result<(), Error> {
        let decoy = self
            .decoy
            .get_or_try_init(|| self.hash(DECOY_PASSWORD))
            .await?
            .clone();
        self.verify(password, decoy).await?;
        Ok(())
    }

    async fn require_account(&self, user_id: &UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            self.verify_decoy(credentials.password()).await?;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .verify(credentials.password(), account.password_hash.clone())
            .await?
        {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(account.user)
    }

    async fn sign_up(&self, details: &SignupDetails) -> Result<User, Error> {
        if self
            .users
            .find_by_email(details.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(email_taken());
        }

        let account = UserAccount {
            user: User {
                id: UserId::random(),
                name: details.name().cloned(),
                email: details.email().clone(),
            },
            password_hash: self.hash(details.password()).await?,
        };
        self.users.insert(&account).await.map_err(map_user_error)?;
        info!(user_id = %account.user.id, "account created");
        Ok(account.user)
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        Ok(self.require_account(user_id).await?.user)
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn update_profile(&self, user_id: &UserId, profile: &UserProfile) -> Result<User, Error> {
        self.users
            .update_profile(user_id, profile)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn change_password(&self, user_id: &UserId, change: &PasswordChange) -> Result<(), Error> {
        let account = self.require_account(user_id).await?;
        if !self.verify(change.current(), account.password_hash).await? {
            return Err(
                Error::invalid_request("Current password is incorrect").with_details(json!({
                    "field": "currentPassword",
                    "code": "incorrect_password",
                })),
            );
        }

        let hash = self.hash(change.new_password()).await?;
        if !self
            .users
            .update_password(user_id, &hash)
            .await
            .map_err(map_user_error)?
        {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(%user_id, "password changed");
        Ok(())
    }

    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error> {
        if !self.users.delete(user_id).await.map_err(map_user_error)? {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(%user_id, "account deleted");
        Ok(())
    }
}
