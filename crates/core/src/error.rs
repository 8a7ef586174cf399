// Copyright 2025 Shellbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared across shellbench crates.

use thiserror::Error;

/// Result type alias using the shellbench [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the shellbench foundation layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied a value that violates a precondition.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an [`Error::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Build an [`Error::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
