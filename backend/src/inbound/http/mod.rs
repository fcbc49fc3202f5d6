//! HTTP inbound adapter exposing REST endpoints.

pub mod days;
pub mod error;
pub mod habits;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the habit tracker API routes and extractor configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use habit_tracker::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .service(users::login)
        .service(users::current_user)
        .service(habits::create_habit)
        .service(habits::toggle_habit)
        .service(days::day)
        .service(days::summary);
}
