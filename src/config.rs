//! Configuration with validation at startup.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use http::HeaderValue;

/// Runtime environment. Controls how much fault detail may appear in
/// client-facing error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    /// Fault detail may be echoed back to the caller.
    Development,
    /// Fault detail is unconditionally redacted.
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Error-handling demonstration service configuration.
///
/// All values can be set via environment variables or CLI arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "error-boundary-demo", about = "Sanitized error handling demo service")]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "HTTP_ADDRESS", default_value = "0.0.0.0:8080")]
    pub http_address: String,

    /// CORS allowed origins (comma-separated, or "*" for any)
    #[arg(long, env = "CORS_ALLOW_ORIGINS", default_value = "http://localhost:3000")]
    pub cors_allow_origins: String,

    /// Runtime environment
    #[arg(long, env = "ENVIRONMENT", value_enum, default_value = "production")]
    pub environment: Environment,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Use JSON log format
    #[arg(long, env = "JSON_LOGS", default_value = "true")]
    pub json_logs: bool,

    /// Request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout_secs: u64,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CORS origin: {0:?}")]
    InvalidCorsOrigin(String),
    #[error("Request timeout must be > 0")]
    InvalidRequestTimeout,
}

impl Config {
    /// Parse and validate configuration.
    pub fn init() -> anyhow::Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidRequestTimeout);
        }
        if self.cors_allow_origins.trim() != "*" {
            for origin in self.cors_allow_origins.split(',') {
                let origin = origin.trim();
                if origin.is_empty() || origin.parse::<HeaderValue>().is_err() {
                    return Err(ConfigError::InvalidCorsOrigin(origin.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Get request timeout as Duration.
    #[inline]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            http_address: "0.0.0.0:8080".to_string(),
            cors_allow_origins: "http://localhost:3000".to_string(),
            environment: Environment::Production,
            log_level: "INFO".to_string(),
            json_logs: false,
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn wildcard_origin_passes_validation() {
        let mut config = test_config();
        config.cors_allow_origins = "*".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn multiple_origins_pass_validation() {
        let mut config = test_config();
        config.cors_allow_origins = "http://localhost:3000, https://app.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_fails() {
        let mut config = test_config();
        config.request_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRequestTimeout)
        ));
    }

    #[test]
    fn malformed_origin_fails() {
        let mut config = test_config();
        config.cors_allow_origins = "http://localhost:3000,\u{0}bad".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCorsOrigin(_))
        ));
    }

    #[test]
    fn empty_origin_entry_fails() {
        let mut config = test_config();
        config.cors_allow_origins = "http://localhost:3000,,".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCorsOrigin(_))
        ));
    }

    #[test]
    fn environment_flags() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Production.is_development());
    }
}
