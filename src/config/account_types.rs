//! Default account type loading from config.toml
//!
//! The account types listed in config.toml are seeded into the database on startup
//! so a fresh install already has the usual Assets/Liabilities/Income/Expenses/Equity
//! categories. Types that already exist (by name) are left untouched.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Account types to seed
    #[serde(default)]
    pub account_types: Vec<AccountTypeConfig>,
}

/// Configuration for a single account type
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountTypeConfig {
    /// Unique name of the account type
    pub name: String,
    /// Reporting group (e.g., "Assets", "Expenses")
    pub group: String,
}

/// Path of the seed file, from `BUDGET_BOOK_CONFIG` or `./config.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var("BUDGET_BOOK_CONFIG").unwrap_or_else(|_| "config.toml".to_string())
}

/// Loads account type configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Like [`load_config`], but a missing file yields `Ok(None)` instead of an error.
pub fn load_optional_config<P: AsRef<Path>>(path: P) -> Result<Option<Config>> {
    if !path.as_ref().exists() {
        tracing::debug!("No config file at {:?}; skipping seeding", path.as_ref());
        return Ok(None);
    }

    load_config(path).map(Some)
}

fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}
