//! Correlation identifier carried by every request.
//!
//! Held in a tokio task local so that a [`crate::domain::Error`] built deep
//! inside a service can report the id of the request that caused it.
//! Spawned tasks do not inherit it; run them through [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Header name used for both inbound propagation and the response echo.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// UUID identifying one request across logs and error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Adopt a caller-supplied identifier when it is a well-formed UUID,
    /// otherwise mint a new one.
    ///
    /// ```
    /// use cms_backend::domain::TraceId;
    ///
    /// let upstream = "9b2f3c1e-5d4a-4f6b-8c7d-0e1f2a3b4c5d";
    /// assert_eq!(TraceId::adopt_or_generate(Some(upstream)).to_string(), upstream);
    /// assert_ne!(TraceId::adopt_or_generate(Some("junk")).to_string(), "junk");
    /// ```
    #[must_use]
    pub fn adopt_or_generate(inbound: Option<&str>) -> Self {
        inbound
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
