//! Unified error type for the budget book backend.
//!
//! Storage errors (uniqueness and foreign-key violations included) are carried
//! verbatim in [`Error::Database`] so callers see exactly what `SQLite` reported.

use thiserror::Error;

/// All errors produced by configuration, services and storage.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is malformed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// A request field is missing or holds an unusable value
    #[error("{message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// Transaction amounts must be finite and non-negative
    #[error("Invalid amount: {amount}. Amounts must be finite and non-negative.")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A single entity lookup by id found nothing
    #[error("{entity} with ID {id} cannot be found.")]
    NotFound {
        /// Entity name, e.g. `"Account"`
        entity: &'static str,
        /// The id that was looked up
        id: i64,
    },

    /// Storage layer failure, surfaced verbatim
    #[error("{0}")]
    Database(#[from] sea_orm::DbErr),

    /// A JSON payload did not match the expected shape
    #[error("{0}")]
    Payload(#[from] serde_json::Error),

    /// A date string could not be parsed
    #[error("Invalid date: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("I/O error: {0}")]
    #[allow(missing_docs)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
