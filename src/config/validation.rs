//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses parse and TLS material is named
//! - Validate redirect status and documentation paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HostConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::HostConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `tls.cert_path`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const REDIRECT_STATUSES: [u16; 4] = [301, 302, 307, 308];

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_socket_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if let Some(tls) = &config.tls {
        check_socket_addr(&mut errors, "tls.bind_address", &tls.bind_address);
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("tls.key_path", "must not be empty"));
        }
        let ephemeral = tls
            .bind_address
            .parse::<SocketAddr>()
            .map(|addr| addr.port() == 0)
            .unwrap_or(false);
        if !ephemeral && tls.bind_address == config.listener.bind_address {
            errors.push(ValidationError::new(
                "tls.bind_address",
                "must differ from listener.bind_address",
            ));
        }
    }

    let redirect = &config.https_redirection;
    if !REDIRECT_STATUSES.contains(&redirect.status_code) {
        errors.push(ValidationError::new(
            "https_redirection.status_code",
            format!("{} is not one of 301, 302, 307, 308", redirect.status_code),
        ));
    }
    if redirect.https_port == Some(0) {
        errors.push(ValidationError::new("https_redirection.https_port", "must not be 0"));
    }

    let docs = &config.docs;
    check_absolute_path(&mut errors, "docs.json_path", &docs.json_path);
    check_absolute_path(&mut errors, "docs.ui_path", &docs.ui_path);
    if docs.json_path == docs.ui_path {
        errors.push(ValidationError::new("docs.ui_path", "must differ from docs.json_path"));
    }

    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            field,
            format!("'{value}' is not a valid socket address"),
        ));
    }
}

fn check_absolute_path(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if !value.starts_with('/') || value.len() < 2 {
        errors.push(ValidationError::new(
            field,
            format!("'{value}' must be an absolute path below '/'"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&HostConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = HostConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.https_redirection.status_code = 200;
        config.docs.ui_path = "swagger".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "https_redirection.status_code", "docs.ui_path"]
        );
    }

    #[test]
    fn tls_requires_key_material() {
        let mut config = HostConfig::default();
        config.tls = Some(TlsConfig {
            bind_address: "0.0.0.0:5001".into(),
            cert_path: String::new(),
            key_path: " ".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "tls.cert_path: must not be empty");
    }

    #[test]
    fn documentation_paths_must_be_distinct() {
        let mut config = HostConfig::default();
        config.docs.ui_path = config.docs.json_path.clone();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "docs.ui_path");
    }
}
