//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async` and `bb8`. Checkout is non-blocking and bounded by the
//! configured timeout; failures surface as [`PoolError`] so repositories can
//! map them onto their own connection errors.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// The underlying message, without the variant prefix.
    pub fn into_message(self) -> String {
        match self {
            Self::Checkout { message } | Self::Build { message } => message,
        }
    }
}

/// Configuration for the database connection pool.
///
/// # Example
///
/// ```ignore
/// let config = PoolConfig::new("postgres://habits@localhost/habits")
///     .with_max_size(20)
///     .with_connection_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Defaults: 10 connections, 1 kept idle, 30 second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(1),
            connection_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Shared pool handed to every Diesel repository.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the URL is invalid or the initial
    /// idle connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let min_idle = config.min_idle.map(|idle| idle.min(config.max_size));

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] if no connection frees up within the
    /// configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
