//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.address / tls.bind_address
//!     → listener.rs (parse, bind, report local address)
//!     → tls.rs (load certificate and key for the secure listener)
//!     → http::server (one accept loop per listener)
//! ```
//!
//! # Design Decisions
//! - Every socket is bound before any connection is accepted
//! - TLS is optional; without it only the plain listener exists

pub mod listener;
pub mod tls;

pub use listener::{bind, bind_std, ListenerError};
pub use tls::load_tls_config;
