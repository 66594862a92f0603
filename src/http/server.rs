//! HTTP server setup.
//!
//! # Responsibilities
//! - Serve the composed pipeline on the plain listener
//! - Serve the same pipeline over TLS when a secure listener is bound
//! - Tag every request with the transport it arrived on
//! - Stop accepting on shutdown and let in-flight requests finish

use axum::{Extension, Router};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;

use crate::lifecycle::Shutdown;
use crate::pipeline::Transport;

/// Bound secure listener with its TLS material.
pub struct SecureListener {
    pub listener: std::net::TcpListener,
    pub tls: RustlsConfig,
}

/// HTTP server for the API host.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around a composed pipeline router.
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Run until `shutdown` fires, accepting on every given listener.
    pub async fn run(
        self,
        plain: TcpListener,
        secure: Option<SecureListener>,
        shutdown: &Shutdown,
    ) -> Result<(), std::io::Error> {
        let plain_addr = plain.local_addr()?;
        let plain_app = self.router.clone().layer(Extension(Transport::Plain));
        let plain_shutdown = shutdown.clone();

        tracing::info!(address = %plain_addr, transport = "plain", "HTTP server starting");
        let plain_server = async move {
            axum::serve(plain, plain_app.into_make_service())
                .with_graceful_shutdown(drained(plain_shutdown))
                .await
        };

        match secure {
            None => plain_server.await?,
            Some(SecureListener { listener, tls }) => {
                let secure_addr = listener.local_addr()?;
                let secure_app = self.router.layer(Extension(Transport::Secure));

                let handle = Handle::new();
                let drain = handle.clone();
                let secure_shutdown = shutdown.clone();
                tokio::spawn(async move {
                    drained(secure_shutdown).await;
                    drain.graceful_shutdown(None);
                });

                tracing::info!(address = %secure_addr, transport = "tls", "HTTP server starting");
                let secure_server = axum_server::from_tcp_rustls(listener, tls)
                    .handle(handle)
                    .serve(secure_app.into_make_service());

                tokio::try_join!(plain_server, secure_server)?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn drained(shutdown: Shutdown) {
    shutdown.wait().await;
    tracing::info!("Shutdown signal received, draining connections");
}
