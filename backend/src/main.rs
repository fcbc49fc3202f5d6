//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use habit_tracker::inbound::http::health::HealthState;
use habit_tracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;
use server::{HabitsSettings, ServerConfig, create_server};

fn invalid_settings(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("invalid configuration: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = HabitsSettings::load().map_err(invalid_settings)?;
    let mut config = ServerConfig::new(
        settings.bind_addr().map_err(invalid_settings)?,
        settings.session_secret().map_err(invalid_settings)?,
        settings.identity_userinfo_url().map_err(invalid_settings)?,
    )
    .with_session_ttl(settings.session_ttl())
    .with_identity_timeout(settings.identity_timeout());

    match settings.database_url() {
        Some(database_url) => {
            let url = database_url.to_owned();
            web::block(move || run_pending_migrations(&url))
                .await
                .map_err(std::io::Error::other)?
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
            )
            .await
            .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
            info!("using PostgreSQL store");
        }
        None => warn!("no database URL configured; using in-memory store"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!("habit tracker listening");
    server.await
}
