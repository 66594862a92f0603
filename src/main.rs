//! FinTrack API host.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net listener (plain / TLS)
//!                         │
//!                         ▼
//!                     http server ── tags transport
//!                         │
//!                         ▼
//!     ┌──────────────── pipeline ────────────────┐
//!     │ [api description]   Development only     │
//!     │ [docs ui]           Development only     │
//!     │ https redirect                           │
//!     │ route dispatch ──▶ controllers           │
//!     └──────────────────────────────────────────┘
//!
//!     Cross-cutting: config, registry, observability, lifecycle
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use fintrack_api::config::loader;
use fintrack_api::controllers::HealthController;
use fintrack_api::lifecycle::spawn_signal_handler;
use fintrack_api::observability::logging;
use fintrack_api::{Environment, HostBuilder, HostError};

#[derive(Parser)]
#[command(name = "fintrack-api")]
#[command(about = "FinTrack API host", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deployment environment (Development, Staging, Production).
    #[arg(short, long)]
    environment: Option<String>,

    /// Override `listener.bind_address`.
    #[arg(long, env = "APP_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Host failed");
            eprintln!("fintrack-api: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), HostError> {
    let environment = match cli.environment.as_deref() {
        Some(name) => name.parse::<Environment>()?,
        None => Environment::from_env()?,
    };

    let mut config = loader::load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        config = loader::validated(config)?;
    }

    logging::init(&config.observability, environment)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %environment,
        bind_address = %config.listener.bind_address,
        tls = config.tls.is_some(),
        "fintrack-api starting"
    );

    let host = HostBuilder::new(config, environment)
        .controller(HealthController)
        .bind()
        .await?;

    spawn_signal_handler(host.shutdown_handle());
    host.run().await
}
