//! Credential adapters: argon2 password hashing and HS256 session tokens.

mod argon2_password_hasher;
mod jwt_session_tokens;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_session_tokens::{JwtSessionTokens, MIN_SECRET_LEN, generate_secret};
