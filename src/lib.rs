//! FinTrack API host library.
//!
//! Startup and request-pipeline composition: a service registry, an
//! environment-dependent ordered stage list and the listeners that serve it.

pub mod config;
pub mod controllers;
pub mod docs;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod routing;

pub use config::{Environment, HostConfig};
pub use error::HostError;
pub use lifecycle::{Host, HostBuilder, Shutdown};
