//! Host configuration loading.
//!
//! # Responsibilities
//! - Read the TOML file named on the command line, or fall back to defaults
//! - Refuse to start on a config that fails semantic validation
//!
//! # Design Decisions
//! - Errors carry the file path so a failed start names the file at fault
//! - Defaults and CLI overrides pass through the same validation as a file

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::HostConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration was not accepted.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Invalid(Vec<ValidationError>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "config {} is not valid TOML: {}", path.display(), source)
            }
            ConfigError::Invalid(errors) => {
                write!(f, "invalid host config")?;
                for (i, err) in errors.iter().enumerate() {
                    f.write_str(if i == 0 { ": " } else { "; " })?;
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Accept `config` only if it passes validation.
pub fn validated(config: HostConfig) -> Result<HostConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

/// Read, parse and validate the host config at `path`.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validated(config)
}

/// Load the file at `path` when given, otherwise validate and return defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<HostConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => validated(HostConfig::default()),
    }
}
