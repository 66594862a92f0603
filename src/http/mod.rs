//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (axum accept loops, transport tagging)
//!     → request.rs (request ID generation and access)
//!     → pipeline (stages, route dispatch)
//!     → response.rs (host-owned fallback responses)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::{HttpServer, SecureListener};
