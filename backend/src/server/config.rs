//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use habit_tracker::outbound::persistence::DbPool;
use url::Url;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_secret: Zeroizing<Vec<u8>>,
    pub(crate) session_ttl: chrono::Duration,
    pub(crate) identity_endpoint: Url,
    pub(crate) identity_timeout: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration with a one-day session lifetime, a ten second identity
    /// timeout and the in-memory store.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        session_secret: Zeroizing<Vec<u8>>,
        identity_endpoint: Url,
    ) -> Self {
        Self {
            bind_addr,
            session_secret,
            session_ttl: chrono::Duration::days(1),
            identity_endpoint,
            identity_timeout: Duration::from_secs(10),
            db_pool: None,
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_identity_timeout(mut self, timeout: Duration) -> Self {
        self.identity_timeout = timeout;
        self
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one, every repository port is served by the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
