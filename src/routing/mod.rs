//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Controllers (at startup):
//!     Controller::register_routes
//!     → table.rs (RouteRegistrar collects method + pattern + handler)
//!     → pattern.rs (parse, validate, detect conflicting captures)
//!     → Freeze as immutable RouteTable
//!
//! Requests:
//!     RouteTable → pipeline::dispatch (axum router) → handler
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Matching itself is axum's; this module only owns the table
//! - Deterministic: same (method, path) always reaches the same handler

pub mod pattern;
pub mod table;

pub use pattern::{PatternError, RoutePattern, Segment};
pub use table::{
    QueryParam, RouteEntry, RouteError, RouteMetadata, RouteOptions, RouteRegistrar, RouteTable,
    RouteTableBuilder,
};
