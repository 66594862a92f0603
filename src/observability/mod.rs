//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline tracking stage and startup code produce:
//!     → logging.rs (structured log events, pretty or JSON)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (log aggregation)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
