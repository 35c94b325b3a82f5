//! Account identity: ids, validated e-mail addresses and display names.

use std::sync::OnceLock;

use regex::Regex;

use super::ids::uuid_identifier;

uuid_identifier!(
    /// Stable user identifier.
    UserId
);

/// Longest display name accepted for an account.
pub const USER_NAME_MAX: usize = 100;

/// Validation errors for account fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The address is not shaped like `local@domain.tld`.
    #[error("Invalid email address")]
    InvalidEmail,
    /// The display name exceeds [`USER_NAME_MAX`] characters.
    #[error("Name must be at most {max} characters")]
    NameTooLong {
        /// Maximum number of characters.
        max: usize,
    },
}

#[expect(
    clippy::expect_used,
    reason = "pattern is a compile-time constant covered by tests"
)]
fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid e-mail regex")
    })
}

/// Syntactically valid e-mail address, trimmed of surrounding whitespace.
///
/// Addresses are compared exactly as entered; uniqueness is enforced by the
/// user store.
///
/// # Examples
/// ```
/// use formly::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  ada@example.com ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert!(EmailAddress::parse("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if email_regex().is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(UserValidationError::InvalidEmail)
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional human-readable account name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Normalise a raw name: blank input yields `None`.
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, UserValidationError> {
        let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Optional display name.
    pub name: Option<UserName>,
    /// Unique sign-in address.
    pub email: EmailAddress,
}

/// Editable profile fields for `PUT /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// New display name; `None` clears it.
    pub name: Option<UserName>,
    /// New sign-in address.
    pub email: EmailAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com")]
    #[case("first.last+tag@sub.example.org")]
    fn accepts_well_formed_addresses(#[case] raw: &str) {
        let email = EmailAddress::parse(raw).expect("valid address");
        assert_eq!(email.as_ref(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("ada")]
    #[case("ada@example")]
    #[case("ada lovelace@example.com")]
    #[case("@example.com")]
    fn rejects_malformed_addresses(#[case] raw: &str) {
        assert_eq!(
            EmailAddress::parse(raw),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_names_normalise_to_none(#[case] raw: Option<&str>) {
        assert_eq!(UserName::parse_optional(raw), Ok(None));
    }

    #[rstest]
    fn names_are_trimmed() {
        let name = UserName::parse_optional(Some("  Ada  "))
            .expect("valid")
            .expect("present");
        assert_eq!(name.as_ref(), "Ada");
    }

    #[rstest]
    fn overlong_names_are_rejected() {
        let raw = "x".repeat(USER_NAME_MAX + 1);
        assert_eq!(
            UserName::parse_optional(Some(&raw)),
            Err(UserValidationError::NameTooLong { max: USER_NAME_MAX })
        );
    }

    #[rstest]
    fn user_ids_parse_from_strings() {
        let id = UserId::random();
        let parsed: UserId = id.to_string().parse().expect("uuid");
        assert_eq!(parsed, id);
    }
}
