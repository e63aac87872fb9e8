//! Unified error types for the finance tracker.
//!
//! Every repository operation returns [`Result`]. Lookups that find nothing return
//! `Ok(None)`; the variants below are reserved for writes that cannot proceed.

use thiserror::Error;

/// Errors produced by the data-access layer, configuration, and the console front end.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input (empty name, zero amount, non-finite number)
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A uniqueness rule was violated (duplicate email)
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting value
        message: String,
    },

    /// A referenced row does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"User"`
        entity: &'static str,
        /// Identifier that failed to resolve
        id: i64,
    },

    /// A reference exists but breaks a cross-entity ownership rule
    #[error("Integrity error: {message}")]
    Integrity {
        /// Which rule was broken
        message: String,
    },

    /// Failure reported by `SeaORM` or the underlying driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Settings could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Reason the configuration was rejected
        message: String,
    },

    /// Console I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
