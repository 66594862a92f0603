//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Environment → Service registry → Pipeline → Bind listeners → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: nothing is bound until the pipeline is valid
//! - Startup failures are fatal and surface before the accept loop
//! - In-flight requests run to completion; no forced deadline

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::{spawn_signal_handler, wait_for_signal, Signal};
pub use startup::{compose_pipeline, Host, HostBuilder};
