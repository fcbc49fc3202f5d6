//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::HabitsSettings;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};

use habit_tracker::Trace;
#[cfg(debug_assertions)]
use habit_tracker::doc::ApiDoc;
use habit_tracker::inbound::http;
use habit_tracker::inbound::http::health::{HealthState, live, ready};
use habit_tracker::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(http::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the identity client cannot be built or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let http_state = build_http_state(&config, clock)?;
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
