//! Per-request progress through the pipeline.
//!
//! A request starts `Pending`, is settled by exactly one stage (short-circuit
//! or dispatch) and ends `Completed`. The settling stage records its outcome
//! as a response extension; the outermost tracking stage reads it back.

use std::fmt;
use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::pipeline::stage::StageKind;

/// How a request left the stage list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// A stage produced the response without reaching a handler.
    ShortCircuited(StageKind),
    /// A matched route handler produced the response.
    Dispatched,
}

impl StageOutcome {
    pub fn label(self) -> &'static str {
        match self {
            StageOutcome::ShortCircuited(kind) => kind.as_str(),
            StageOutcome::Dispatched => "dispatched",
        }
    }
}

/// Lifecycle state of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Pending,
    ShortCircuited(StageKind),
    Dispatched,
    Completed,
}

impl From<StageOutcome> for RequestPhase {
    fn from(outcome: StageOutcome) -> Self {
        match outcome {
            StageOutcome::ShortCircuited(kind) => RequestPhase::ShortCircuited(kind),
            StageOutcome::Dispatched => RequestPhase::Dispatched,
        }
    }
}

/// A backwards or skipping transition was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid request phase transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: RequestPhase,
    pub to: RequestPhase,
}

impl RequestPhase {
    /// Move forward to `next`; only `Pending → settled → Completed` is allowed.
    pub fn advance(self, next: RequestPhase) -> Result<RequestPhase, InvalidTransition> {
        use RequestPhase::*;
        match (self, next) {
            (Pending, ShortCircuited(_)) | (Pending, Dispatched) => Ok(next),
            (ShortCircuited(_), Completed) | (Dispatched, Completed) => Ok(next),
            _ => Err(InvalidTransition { from: self, to: next }),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == RequestPhase::Completed
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestPhase::Pending => f.write_str("pending"),
            RequestPhase::ShortCircuited(kind) => write!(f, "short_circuited({kind})"),
            RequestPhase::Dispatched => f.write_str("dispatched"),
            RequestPhase::Completed => f.write_str("completed"),
        }
    }
}

/// Outermost stage: observe the settling outcome, log and record metrics.
pub async fn track_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.request_id().unwrap_or("unknown").to_string();

    let response = next.run(request).await;

    // Responses that escaped every stage marker are treated as routing misses.
    let outcome = response
        .extensions()
        .get::<StageOutcome>()
        .copied()
        .unwrap_or(StageOutcome::ShortCircuited(StageKind::RouteDispatch));
    let status = response.status().as_u16();

    match RequestPhase::Pending
        .advance(outcome.into())
        .and_then(|settled| settled.advance(RequestPhase::Completed))
    {
        Ok(_) => tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            outcome = outcome.label(),
            "Request completed"
        ),
        Err(e) => tracing::warn!(request_id = %request_id, error = %e, "Request phase out of order"),
    }

    metrics::record_request(method.as_str(), status, outcome.label(), start);
    response
}
