//! Port for issuing and verifying signed session tokens.

use crate::domain::SessionClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by session token adapters.
    pub enum SessionTokenError {
        /// Signature, structure or claims are not acceptable.
        Invalid { message: String } => "session token is invalid: {message}",
        /// The token is past its expiry.
        Expired => "session token has expired",
        /// A token could not be produced.
        Signing { message: String } => "failed to sign session token: {message}",
    }
}

/// Stateless session tokens carried in the `auth-token` cookie.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokenService: Send + Sync {
    /// Issue a token valid for [`crate::domain::SESSION_TTL_SECS`].
    fn issue(&self, claims: &SessionClaims) -> Result<String, SessionTokenError>;

    /// Verify a token and return its claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError>;
}
