//! Authentication primitives: credentials, sign-up details, password hashes
//! and session claims.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::Duration;
use zeroize::Zeroizing;

use super::user::{EmailAddress, UserId, UserName, UserValidationError};

/// Lifetime of an issued session token and its cookie, in seconds.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// [`SESSION_TTL_SECS`] as a [`Duration`].
#[must_use]
pub fn session_ttl() -> Duration {
    Duration::seconds(SESSION_TTL_SECS)
}

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// The e-mail address is malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// The optional display name is too long.
    NameTooLong {
        /// Maximum number of characters.
        max: usize,
    },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::EmptyPassword => write!(f, "Password is required"),
            Self::NameTooLong { max } => write!(f, "Name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<UserValidationError> for LoginValidationError {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::InvalidEmail => Self::InvalidEmail,
            UserValidationError::NameTooLong { max } => Self::NameTooLong { max },
        }
    }
}

fn require_password(password: &str) -> Result<Zeroizing<String>, LoginValidationError> {
    if password.is_empty() {
        return Err(LoginValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is syntactically valid.
/// - `password` is non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use formly::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw e-mail/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::parse(email)?;
        let password = require_password(password)?;
        Ok(Self { email, password })
    }

    /// Address used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated account registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    name: Option<UserName>,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignupDetails {
    /// Construct sign-up details from raw inputs.
    pub fn try_from_parts(
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        let name = UserName::parse_optional(name)?;
        let email = EmailAddress::parse(email)?;
        let password = require_password(password)?;
        Ok(Self {
            name,
            email,
            password,
        })
    }

    /// Optional display name.
    #[must_use]
    pub fn name(&self) -> Option<&UserName> {
        self.name.as_ref()
    }

    /// Address to register.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password to hash.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Request to rotate an account password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    new: Zeroizing<String>,
}

impl PasswordChange {
    /// Both passwords must be non-empty.
    pub fn try_from_parts(current: &str, new: &str) -> Result<Self, LoginValidationError> {
        Ok(Self {
            current: require_password(current)?,
            new: require_password(new)?,
        })
    }

    /// Password the caller claims is current.
    #[must_use]
    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    /// Replacement password.
    #[must_use]
    pub fn new_password(&self) -> &str {
        self.new.as_str()
    }
}

/// Opaque salted password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::PasswordHasher`].
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded representation for storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Identity carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Authenticated account.
    pub user_id: UserId,
    /// Address at the time the token was issued.
    pub email: EmailAddress,
}
