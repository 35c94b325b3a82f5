//! HS256 JWT implementation of the [`SessionTokenService`] port.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{SessionTokenError, SessionTokenService};
use crate::domain::{EmailAddress, SessionClaims, UserId, session_ttl};

/// Shortest accepted signing secret in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    iat: i64,
    exp: i64,
}

/// Fresh random signing secret of [`MIN_SECRET_LEN`] bytes.
pub fn generate_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0_u8; MIN_SECRET_LEN]);
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtSessionTokens {
    /// Build from a secret of at least [`MIN_SECRET_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionTokenError::Signing`] when the secret is too short.
    pub fn from_secret(secret: &[u8]) -> Result<Self, SessionTokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(SessionTokenError::signing(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: session_ttl(),
        })
    }

    /// Override the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl SessionTokenService for JwtSessionTokens {
    fn issue(&self, claims: &SessionClaims) -> Result<String, SessionTokenError> {
        let now = Utc::now();
        let payload = Claims {
            sub: *claims.user_id.as_uuid(),
            email: claims.email.as_ref().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|err| SessionTokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => SessionTokenError::expired(),
                _ => SessionTokenError::invalid(err.to_string()),
            }
        })?;
        let email = EmailAddress::parse(&data.claims.email)
            .map_err(|err| SessionTokenError::invalid(err.to_string()))?;
        Ok(SessionClaims {
            user_id: UserId::from_uuid(data.claims.sub),
            email,
        })
    }
}
