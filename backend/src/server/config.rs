//! HTTP server configuration object and helpers.

use formly::outbound::persistence::DbPool;
use std::net::SocketAddr;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) secret: Zeroizing<Vec<u8>>,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from the session signing secret and
    /// listener settings.
    #[must_use]
    pub fn new(secret: Zeroizing<Vec<u8>>, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            secret,
            cookie_secure,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the Diesel repositories instead of the
    /// in-memory store and readiness probes ping the database.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
