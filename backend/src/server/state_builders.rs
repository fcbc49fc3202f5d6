//! Builders wiring repository adapters into the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use habit_tracker::domain::ports::{
    CompletionRepository, HabitCommand, HabitQuery, HabitRepository, IdentityProvider,
    LoginService, SessionTokens, UserRepository,
};
use habit_tracker::domain::{HabitService, IdentityResolver};
use habit_tracker::inbound::http::state::{HttpState, HttpStatePorts};
use habit_tracker::outbound::identity::UserInfoHttpSource;
use habit_tracker::outbound::memory::InMemoryStore;
use habit_tracker::outbound::persistence::{
    DieselCompletionRepository, DieselHabitRepository, DieselUserRepository,
};
use habit_tracker::outbound::session::JwtSessionTokens;

use super::ServerConfig;

/// Repositories backing the services, whichever store provides them.
struct Repositories<U, H, C> {
    users: Arc<U>,
    habits: Arc<H>,
    completions: Arc<C>,
}

/// Adapters shared by every store choice.
struct SharedAdapters<P> {
    provider: Arc<P>,
    sessions: Arc<JwtSessionTokens>,
    clock: Arc<dyn Clock>,
    session_ttl: chrono::Duration,
}

fn assemble_ports<P, U, H, C>(
    shared: SharedAdapters<P>,
    repositories: Repositories<U, H, C>,
) -> HttpStatePorts
where
    P: IdentityProvider + 'static,
    U: UserRepository + 'static,
    H: HabitRepository + 'static,
    C: CompletionRepository + 'static,
{
    let SharedAdapters {
        provider,
        sessions,
        clock,
        session_ttl,
    } = shared;
    let Repositories {
        users,
        habits,
        completions,
    } = repositories;

    let login = Arc::new(IdentityResolver::new(
        provider,
        users,
        sessions.clone(),
        clock.clone(),
        session_ttl,
    ));
    let habit_service = Arc::new(HabitService::new(habits, completions, clock));

    HttpStatePorts {
        login: login as Arc<dyn LoginService>,
        habits: habit_service.clone() as Arc<dyn HabitCommand>,
        habits_query: habit_service as Arc<dyn HabitQuery>,
        sessions: sessions as Arc<dyn SessionTokens>,
    }
}

fn build_ports<P>(config: &ServerConfig, shared: SharedAdapters<P>) -> HttpStatePorts
where
    P: IdentityProvider + 'static,
{
    match &config.db_pool {
        Some(pool) => assemble_ports(
            shared,
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                habits: Arc::new(DieselHabitRepository::new(pool.clone())),
                completions: Arc::new(DieselCompletionRepository::new(pool.clone())),
            },
        ),
        None => {
            let store = Arc::new(InMemoryStore::new());
            assemble_ports(
                shared,
                Repositories {
                    users: store.clone(),
                    habits: store.clone(),
                    completions: store,
                },
            )
        }
    }
}

/// Build the HTTP state for `config`, reading time from `clock`.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the identity provider client cannot be
/// constructed.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<web::Data<HttpState>> {
    let provider = UserInfoHttpSource::new(config.identity_endpoint.clone(), config.identity_timeout)
        .map_err(|err| std::io::Error::other(format!("identity client: {err}")))?;
    let shared = SharedAdapters {
        provider: Arc::new(provider),
        sessions: Arc::new(JwtSessionTokens::new(&config.session_secret, clock.clone())),
        clock,
        session_ttl: config.session_ttl,
    };
    Ok(web::Data::new(HttpState::new(build_ports(config, shared))))
}
