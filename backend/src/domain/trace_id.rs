//! Request-scoped trace identifier.
//!
//! The identifier lives in Tokio task-local storage so errors and log lines can
//! pick it up without threading it through every call. Task locals do not
//! follow `tokio::spawn`; wrap spawned work in [`TraceId::scope`].

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Correlation identifier for one inbound request.
///
/// # Examples
/// ```
/// use habit_tracker::domain::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "00000000-0000-0000-0000-000000000000".parse().expect("uuid");
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the enclosing scope, if any.
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn nested_scopes_shadow_the_outer_identifier() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let seen = TraceId::scope(outer, async move {
            TraceId::scope(inner, async { TraceId::current() }).await
        })
        .await;
        assert_eq!(seen, Some(inner));
    }

    #[test]
    fn rejects_non_uuid_input() {
        assert!("not-a-trace".parse::<TraceId>().is_err());
    }
}
