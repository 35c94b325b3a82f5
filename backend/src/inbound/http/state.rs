//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, FormCommand, FormQuery, FormResultsQuery, LoginService,
    ResponseCommand, SessionTokenService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Credential check for sign-in.
    pub login: Arc<dyn LoginService>,
    /// Current-account lookup.
    pub account_query: Arc<dyn AccountQuery>,
    /// Sign-up, profile, password and deletion.
    pub account_command: Arc<dyn AccountCommand>,
    /// Form create, replace and delete.
    pub form_command: Arc<dyn FormCommand>,
    /// Form listing, viewing and owner response listing.
    pub form_query: Arc<dyn FormQuery>,
    /// Table, chart and CSV result views.
    pub form_results: Arc<dyn FormResultsQuery>,
    /// Public response submission.
    pub responses: Arc<dyn ResponseCommand>,
    /// Session token signing and verification.
    pub tokens: Arc<dyn SessionTokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential check for sign-in.
    pub login: Arc<dyn LoginService>,
    /// Current-account lookup.
    pub account_query: Arc<dyn AccountQuery>,
    /// Sign-up, profile, password and deletion.
    pub account_command: Arc<dyn AccountCommand>,
    /// Form create, replace and delete.
    pub form_command: Arc<dyn FormCommand>,
    /// Form listing, viewing and owner response listing.
    pub form_query: Arc<dyn FormQuery>,
    /// Table, chart and CSV result views.
    pub form_results: Arc<dyn FormResultsQuery>,
    /// Public response submission.
    pub responses: Arc<dyn ResponseCommand>,
    /// Session token signing and verification.
    pub tokens: Arc<dyn SessionTokenService>,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from port implementations. Cookies default to `Secure`.
    ///
    /// # Examples
    /// ```ignore
    /// use formly::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(ports).with_cookie_secure(false);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            account_query,
            account_command,
            form_command,
            form_query,
            form_results,
            responses,
            tokens,
        } = ports;
        Self {
            login,
            account_query,
            account_command,
            form_command,
            form_query,
            form_results,
            responses,
            tokens,
            cookie_secure: true,
        }
    }

    /// Override the `Secure` cookie attribute, e.g. for plain-HTTP development.
    #[must_use]
    pub fn with_cookie_secure(mut self, cookie_secure: bool) -> Self {
        self.cookie_secure = cookie_secure;
        self
    }
}
