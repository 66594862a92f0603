//! Deployment environment flag.
//!
//! Read once at process start and passed by value through host construction.
//! Only [`Environment::Development`] exposes the documentation surfaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name of the process environment variable holding the deployment mode.
pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Runtime deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "Development",
            Environment::Staging => "Staging",
            Environment::Production => "Production",
        }
    }

    /// Read the environment from [`ENVIRONMENT_VAR`], falling back to production when unset.
    pub fn from_env() -> Result<Self, UnknownEnvironment> {
        match std::env::var(ENVIRONMENT_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Environment::default()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an environment name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment '{0}' (expected Development, Staging or Production)")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Development".parse(), Ok(Environment::Development));
        assert_eq!("PRODUCTION".parse(), Ok(Environment::Production));
        assert_eq!(" staging ".parse(), Ok(Environment::Staging));
        assert_eq!("dev".parse(), Ok(Environment::Development));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "qa".parse::<Environment>().unwrap_err();
        assert_eq!(err, UnknownEnvironment("qa".into()));
    }

    #[test]
    fn only_development_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
        assert_eq!(Environment::default(), Environment::Production);
    }
}
