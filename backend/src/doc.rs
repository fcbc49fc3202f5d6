//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the error
//! schema wrappers from [`crate::inbound::http::schemas`], and the bearer
//! session security scheme. Swagger UI serves it in debug builds.

use crate::inbound::http::days::{DayResponse, DaySummaryBody};
use crate::inbound::http::habits::{CreateHabitRequest, HabitBody, ToggleResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LoginRequest, LoginResponse, MeResponse, SessionUser};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer session security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Session token issued by POST /users."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Habit tracker API",
        description = "Habits with weekly schedules, daily completions and completion summaries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::habits::create_habit,
        crate::inbound::http::habits::toggle_habit,
        crate::inbound::http::days::day,
        crate::inbound::http::days::summary,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        LoginResponse,
        MeResponse,
        SessionUser,
        CreateHabitRequest,
        HabitBody,
        ToggleResponse,
        DayResponse,
        DaySummaryBody,
    )),
    tags(
        (name = "users", description = "Login and session claims"),
        (name = "habits", description = "Habit creation and completion toggles"),
        (name = "days", description = "Day view and completion summary"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
