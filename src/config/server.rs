//! HTTP server settings loaded from environment variables.
//!
//! Reads `BUDGET_BOOK_HOST` and `BUDGET_BOOK_PORT` (usually from the `.env` file)
//! and falls back to `127.0.0.1:5000`.

use crate::errors::{Error, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Where the HTTP API listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

impl ServerConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var("BUDGET_BOOK_HOST").ok(),
            std::env::var("BUDGET_BOOK_PORT").ok(),
        )
    }

    /// Builds the configuration from optional raw values, applying defaults.
    pub fn from_values(host: Option<String>, port: Option<String>) -> Result<Self> {
        let port = match port {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| Error::Config {
                message: format!("Invalid BUDGET_BOOK_PORT '{raw}': {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// `host:port` string suitable for binding a listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_defaults_when_not_configured() {
        let config = ServerConfig::from_values(None, None).unwrap();
        assert_eq!(config.address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_configured_values() {
        let config =
            ServerConfig::from_values(Some("0.0.0.0".to_string()), Some("8080".to_string()))
                .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let result = ServerConfig::from_values(None, Some("eighty".to_string()));
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
