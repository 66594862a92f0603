//! Request pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! request
//!     → tracking (phase.rs: outcome, log, metrics)
//!     → [api description]     (Development only, short-circuits on its path)
//!     → [docs ui]             (Development only, short-circuits on its path)
//!     → https_redirect.rs     (plain transport + secure port → redirect)
//!     → dispatch.rs           (route table → handler, or 404)
//! ```
//!
//! # Design Decisions
//! - builder.rs assembles the stage list once; it is never mutated afterwards
//! - Each settling stage tags its response with a `StageOutcome`

pub mod builder;
pub mod dispatch;
pub mod https_redirect;
pub mod phase;
pub mod stage;

pub use builder::{Pipeline, PipelineBuilder, PipelineError};
pub use https_redirect::{HttpsRedirect, Transport};
pub use phase::{RequestPhase, StageOutcome};
pub use stage::{Stage, StageKind};
