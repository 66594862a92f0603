//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for the API host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Plain (insecure) listener.
    pub listener: ListenerConfig,

    /// Optional secure listener. When absent only the plain listener is bound.
    pub tls: Option<TlsConfig>,

    /// Transport-upgrade redirect policy.
    pub https_redirection: HttpsRedirectionConfig,

    /// API description and documentation UI settings.
    pub docs: DocsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl HostConfig {
    /// Port advertised in transport-upgrade redirects.
    ///
    /// An explicit `https_redirection.https_port` wins; otherwise the port of the
    /// configured TLS listener is used. A TLS listener bound to port 0 has no
    /// stable public port, so it resolves to `None`.
    pub fn secure_port(&self) -> Option<u16> {
        if let Some(port) = self.https_redirection.https_port {
            return Some(port);
        }
        self.tls
            .as_ref()
            .and_then(|tls| tls.bind_address.parse::<SocketAddr>().ok())
            .map(|addr| addr.port())
            .filter(|port| *port != 0)
    }
}

/// Plain listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// TLS listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Bind address of the secure listener (e.g., "0.0.0.0:5001").
    #[serde(default = "default_tls_bind")]
    pub bind_address: String,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

fn default_tls_bind() -> String {
    "0.0.0.0:5001".to_string()
}

/// Transport-upgrade redirect configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpsRedirectionConfig {
    /// Public HTTPS port used in redirect targets. Defaults to the TLS listener port.
    pub https_port: Option<u16>,

    /// Redirect status code: 301, 302, 307 or 308.
    pub status_code: u16,
}

impl Default for HttpsRedirectionConfig {
    fn default() -> Self {
        Self {
            https_port: None,
            status_code: 308,
        }
    }
}

/// API description and documentation UI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Title of the generated API description.
    pub title: String,

    /// Document version, also the `{version}` segment of the default JSON path.
    pub version: String,

    /// Path serving the machine-readable description.
    pub json_path: String,

    /// Path serving the interactive documentation page.
    pub ui_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: "FinTrack.Api".to_string(),
            version: "v1".to_string(),
            json_path: "/swagger/v1/swagger.json".to_string(),
            ui_path: "/swagger".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty in development, JSON otherwise.
    #[default]
    Auto,
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Auto,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_secure_port() {
        let config = HostConfig::default();
        assert!(config.tls.is_none());
        assert_eq!(config.secure_port(), None);
        assert_eq!(config.docs.json_path, "/swagger/v1/swagger.json");
    }

    #[test]
    fn secure_port_prefers_explicit_setting() {
        let mut config = HostConfig::default();
        config.tls = Some(TlsConfig {
            bind_address: "0.0.0.0:5001".into(),
            cert_path: "cert.pem".into(),
            key_path: "key.pem".into(),
        });
        assert_eq!(config.secure_port(), Some(5001));

        config.https_redirection.https_port = Some(443);
        assert_eq!(config.secure_port(), Some(443));
    }

    #[test]
    fn ephemeral_tls_port_does_not_resolve() {
        let mut config = HostConfig::default();
        config.tls = Some(TlsConfig {
            bind_address: "127.0.0.1:0".into(),
            cert_path: "cert.pem".into(),
            key_path: "key.pem".into(),
        });
        assert_eq!(config.secure_port(), None);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: HostConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:8080"

            [tls]
            cert_path = "/etc/tls/cert.pem"
            key_path = "/etc/tls/key.pem"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.tls.as_ref().unwrap().bind_address, "0.0.0.0:5001");
        assert_eq!(config.https_redirection.status_code, 308);
        assert_eq!(config.observability.log_format, LogFormat::Auto);
    }
}
