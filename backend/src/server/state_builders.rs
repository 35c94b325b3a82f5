//! Builders for HTTP state ports and the readiness dependency.

use std::sync::Arc;

use async_trait::async_trait;

use formly::domain::ports::{
    FormRepository, PasswordHasher, ResponseRepository, SessionTokenService, UserRepository,
};
use formly::domain::{AccountService, FormService, ResponseSubmissionService};
use formly::inbound::http::health::ReadinessCheck;
use formly::inbound::http::state::{HttpState, HttpStatePorts};
use formly::outbound::memory::InMemoryStore;
use formly::outbound::persistence::{
    DbPool, DieselFormRepository, DieselResponseRepository, DieselUserRepository,
};
use formly::outbound::security::{Argon2PasswordHasher, JwtSessionTokens};

use super::ServerConfig;

/// Readiness dependency that pings the database pool.
struct DbReadiness {
    pool: DbPool,
}

#[async_trait]
impl ReadinessCheck for DbReadiness {
    async fn check(&self) -> Result<(), String> {
        self.pool.ping().await.map_err(|err| err.to_string())
    }
}

/// Readiness dependency for the configured backing store, if any.
pub(super) fn build_readiness(config: &ServerConfig) -> Option<Arc<dyn ReadinessCheck>> {
    config.db_pool.as_ref().map(|pool| {
        Arc::new(DbReadiness { pool: pool.clone() }) as Arc<dyn ReadinessCheck>
    })
}

/// Wire the domain services over one set of repositories.
fn wire_ports<U, F, R, H>(
    users: Arc<U>,
    forms: Arc<F>,
    responses: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<dyn SessionTokenService>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    F: FormRepository + 'static,
    R: ResponseRepository + 'static,
    H: PasswordHasher + 'static,
{
    let accounts = Arc::new(AccountService::new(users, hasher));
    let form_service = Arc::new(FormService::new(Arc::clone(&forms)));
    let submissions = Arc::new(ResponseSubmissionService::new(forms, responses));

    HttpStatePorts {
        login: accounts.clone(),
        account_query: accounts.clone(),
        account_command: accounts,
        form_command: form_service.clone(),
        form_query: form_service.clone(),
        form_results: form_service,
        responses: submissions,
        tokens,
    }
}

/// Build the session token service from the configured secret.
///
/// # Errors
/// Returns [`std::io::Error`] when the secret is too short to sign with.
pub(super) fn build_tokens(config: &ServerConfig) -> std::io::Result<Arc<dyn SessionTokenService>> {
    let tokens = JwtSessionTokens::from_secret(&config.secret)
        .map_err(|err| std::io::Error::other(format!("invalid session secret: {err}")))?;
    Ok(Arc::new(tokens))
}

/// Build HTTP state using the Diesel repositories when a pool is available,
/// otherwise a process-local in-memory store.
pub(super) fn build_http_state(
    config: &ServerConfig,
    tokens: Arc<dyn SessionTokenService>,
) -> HttpState {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let ports = match &config.db_pool {
        Some(pool) => wire_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselFormRepository::new(pool.clone())),
            Arc::new(DieselResponseRepository::new(pool.clone())),
            hasher,
            tokens,
        ),
        None => {
            let store = Arc::new(InMemoryStore::new());
            wire_ports(
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                hasher,
                tokens,
            )
        }
    };
    HttpState::new(ports).with_cookie_secure(config.cookie_secure)
}
