//! TCP listener binding.
//!
//! # Responsibilities
//! - Parse configured bind addresses
//! - Bind sockets before the pipeline starts serving
//! - Surface bind failures as fatal startup errors

use std::net::SocketAddr;

use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// The configured address is not a socket address.
    InvalidAddress {
        address: String,
        source: std::net::AddrParseError,
    },
    /// Failed to bind to address.
    Bind {
        address: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::InvalidAddress { address, source } => {
                write!(f, "Invalid bind address {}: {}", address, source)
            }
            ListenerError::Bind { address, source } => {
                write!(f, "Failed to bind {}: {}", address, source)
            }
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::InvalidAddress { source, .. } => Some(source),
            ListenerError::Bind { source, .. } => Some(source),
        }
    }
}

/// Bind a tokio listener to `address`.
pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
    let addr: SocketAddr = address.parse().map_err(|source| ListenerError::InvalidAddress {
        address: address.to_string(),
        source,
    })?;

    let bind_err = |source| ListenerError::Bind {
        address: address.to_string(),
        source,
    };
    let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
    let local_addr = listener.local_addr().map_err(bind_err)?;

    tracing::info!(address = %local_addr, "Listener bound");
    Ok(listener)
}

/// Bind a non-blocking std listener, for servers that take ownership of one.
pub async fn bind_std(address: &str) -> Result<std::net::TcpListener, ListenerError> {
    let listener = bind(address).await?;
    listener.into_std().map_err(|source| ListenerError::Bind {
        address: address.to_string(),
        source,
    })
}
