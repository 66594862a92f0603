//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HostConfig (validated, immutable)
//!     → passed by reference into host construction
//!
//! APP_ENVIRONMENT / --environment
//!     → environment.rs (Development | Staging | Production)
//! ```
//!
//! # Design Decisions
//! - Config and environment are read once at startup, never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod environment;
pub mod loader;
pub mod schema;
pub mod validation;

pub use environment::Environment;
pub use loader::ConfigError;
pub use schema::{
    DocsConfig, HostConfig, HttpsRedirectionConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, TlsConfig,
};
