//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `HABITS_*` environment variables or a config
//! file, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use tracing::warn;
use url::Url;
use zeroize::Zeroizing;

use habit_tracker::outbound::identity::DEFAULT_USERINFO_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3333";
const DEFAULT_SESSION_TTL_HOURS: u32 = 24;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const MIN_SESSION_SECRET_BYTES: usize = 32;

/// Errors raised while turning raw settings into usable values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid identity user-info URL {value:?}: {message}")]
    IdentityUrl { value: String, message: String },
    #[error("HABITS_SESSION_SECRET is required in release builds")]
    MissingSessionSecret,
    #[error("session secret must be at least 32 bytes")]
    ShortSessionSecret,
}

/// Configuration values for the habit tracker server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HABITS")]
pub struct HabitsSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// HS256 key for session credentials.
    pub session_secret: Option<String>,
    /// Session credential lifetime in hours.
    pub session_ttl_hours: Option<u32>,
    /// Identity provider user-info endpoint.
    pub identity_userinfo_url: Option<String>,
    /// Timeout for identity provider calls, in seconds.
    pub identity_timeout_secs: Option<u64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl HabitsSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        let hours = self
            .session_ttl_hours
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        chrono::Duration::hours(i64::from(hours))
    }

    pub fn identity_userinfo_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .identity_userinfo_url
            .as_deref()
            .unwrap_or(DEFAULT_USERINFO_URL);
        Url::parse(raw).map_err(|err| SettingsError::IdentityUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(
            self.identity_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
        )
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Session signing key.
    ///
    /// Debug builds fall back to a random per-process key, so sessions do
    /// not survive a restart.
    pub fn session_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        self.session_secret_for(cfg!(debug_assertions))
    }

    fn session_secret_for(
        &self,
        allow_ephemeral: bool,
    ) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.session_secret.as_deref() {
            Some(secret) if secret.len() >= MIN_SESSION_SECRET_BYTES => {
                Ok(Zeroizing::new(secret.as_bytes().to_vec()))
            }
            Some(_) => Err(SettingsError::ShortSessionSecret),
            None if allow_ephemeral => {
                warn!("using ephemeral session secret (dev only)");
                let mut bytes = vec![0_u8; MIN_SESSION_SECRET_BYTES];
                rand::thread_rng().fill_bytes(&mut bytes);
                Ok(Zeroizing::new(bytes))
            }
            None => Err(SettingsError::MissingSessionSecret),
        }
    }
}
