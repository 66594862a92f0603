//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber once at startup
//! - Pick the output format from config and environment
//!
//! # Design Decisions
//! - `RUST_LOG` wins over `observability.log_level`
//! - `auto` format: pretty in Development, JSON everywhere else

use tracing_subscriber::{
    fmt::{self, format},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    util::TryInitError,
    EnvFilter,
};

use crate::config::{Environment, LogFormat, ObservabilityConfig};

/// Resolve `auto` against the environment.
pub fn resolve_format(format: LogFormat, environment: Environment) -> LogFormat {
    match format {
        LogFormat::Auto if environment.is_development() => LogFormat::Pretty,
        LogFormat::Auto => LogFormat::Json,
        other => other,
    }
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    format!("fintrack_api={level},tower_http={level}")
}

/// Multi-line, human-oriented output with source locations.
fn pretty_layer<S>() -> fmt::Layer<S, format::Pretty, format::Format<format::Pretty>> {
    fmt::layer().pretty()
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig, environment: Environment) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let json = resolve_format(config.log_format, environment) == LogFormat::Json;
    let json_layer = json.then(|| fmt::layer().json().with_current_span(false));
    let pretty = (!json).then(pretty_layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn pretty_output_spans_lines_with_location() {
        let captured = Captured::default();
        let writer = captured.clone();
        let layer = pretty_layer().with_ansi(false).with_writer(move || writer.clone());

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(account = 7, "Ledger opened");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Ledger opened"));
        assert!(output.contains("account: 7"));
        assert!(output.contains("at src/observability/logging.rs"));
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn auto_follows_environment() {
        assert_eq!(resolve_format(LogFormat::Auto, Environment::Development), LogFormat::Pretty);
        assert_eq!(resolve_format(LogFormat::Auto, Environment::Staging), LogFormat::Json);
        assert_eq!(resolve_format(LogFormat::Json, Environment::Development), LogFormat::Json);
    }

    #[test]
    fn directives_cover_crate_and_http_layer() {
        assert_eq!(default_directives("debug"), "fintrack_api=debug,tower_http=debug");
    }
}
