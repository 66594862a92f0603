//! OS signal handling.
//!
//! SIGINT (Ctrl-C) and, on unix, SIGTERM both trigger graceful shutdown.

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Signal that ended the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

/// Wait for the first shutdown signal.
pub async fn wait_for_signal() -> std::io::Result<Signal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|_| Signal::Interrupt),
            _ = terminate.recv() => Ok(Signal::Terminate),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(Signal::Interrupt)
    }
}

/// Trigger `shutdown` once a signal arrives.
pub fn spawn_signal_handler(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                tracing::info!(signal = ?signal, "Signal received");
                shutdown.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signals"),
        }
    })
}
