//! Host-level error type.
//!
//! Every variant is a startup or serving failure; `main` logs it and exits
//! with status 1.

use std::fmt::Display;

use metrics_exporter_prometheus::BuildError;
use tracing_subscriber::util::TryInitError;

use crate::config::environment::UnknownEnvironment;
use crate::config::ConfigError;
use crate::net::ListenerError;
use crate::pipeline::PipelineError;
use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Environment(#[from] UnknownEnvironment),

    #[error("invalid service registration: {}", join(.0))]
    Registry(Vec<RegistryError>),

    #[error("invalid request pipeline: {}", join(.0))]
    Pipeline(Vec<PipelineError>),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to install log subscriber: {0}")]
    Logging(#[from] TryInitError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl From<Vec<RegistryError>> for HostError {
    fn from(errors: Vec<RegistryError>) -> Self {
        HostError::Registry(errors)
    }
}

impl From<Vec<PipelineError>> for HostError {
    fn from(errors: Vec<PipelineError>) -> Self {
        HostError::Pipeline(errors)
    }
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
