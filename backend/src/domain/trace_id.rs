//! Request-scoped correlation identifier.
//!
//! The HTTP trace middleware opens a scope per request; anything running
//! inside that task (services, repositories, error constructors) can read the
//! identifier through [`TraceId::current`]. Task-local values do not follow
//! `tokio::spawn` or `spawn_blocking`, so wrap such work in [`TraceId::scope`].

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use course_feedback::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
///     .parse()
///     .expect("valid UUID");
/// let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
/// assert_eq!(observed, Some(trace_id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The identifier in scope for the current task, if any.
    #[must_use]
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
    async fn scope_exposes_identifier() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn nothing_in_scope_outside_a_request() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn spawned_tasks_need_an_explicit_scope() {
        let outer = TraceId::generate();
        let observed = TraceId::scope(outer, async {
            tokio::spawn(async { TraceId::current() })
                .await
                .expect("join spawned task")
        })
        .await;
        assert!(observed.is_none());
    }

    #[test]
    fn parses_and_displays_uuid_text() {
        let text = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let trace_id: TraceId = text.parse().expect("valid uuid");
        assert_eq!(trace_id.to_string(), text);
        assert!("not-a-uuid".parse::<TraceId>().is_err());
    }
}
