//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{HabitCommand, HabitQuery, LoginService, SessionTokens};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub habits: Arc<dyn HabitCommand>,
    pub habits_query: Arc<dyn HabitQuery>,
    pub sessions: Arc<dyn SessionTokens>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub habits: Arc<dyn HabitCommand>,
    pub habits_query: Arc<dyn HabitQuery>,
    pub sessions: Arc<dyn SessionTokens>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use habit_tracker::inbound::http::state::{HttpState, HttpStatePorts};
    /// # fn ports() -> HttpStatePorts { unimplemented!() }
    ///
    /// let state = HttpState::new(ports());
    /// let _login = Arc::clone(&state.login);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            habits,
            habits_query,
            sessions,
        } = ports;
        Self {
            login,
            habits,
            habits_query,
            sessions,
        }
    }
}
