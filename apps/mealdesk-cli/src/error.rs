//! # CLI Error Type
//!
//! Everything that can stop a command, as printed on the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ─┐                                                     │
//! │                   ├─► CoreError ──┐                                     │
//! │  CatalogError ────┘               ├─► CliError ──► "Error: ..." exit 1 │
//! │  io / serde_json / toml ──────────┘                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use mealdesk_core::{CatalogError, CoreError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The order request is not valid JSON for an order request.
    #[error("Invalid order request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// The config file is not valid TOML.
    #[error("Invalid config file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Catalog loading or installation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The order line was rejected.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Output Errors
    // =========================================================================
    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealdesk_core::ValidationError;

    #[test]
    fn test_core_errors_keep_their_message() {
        let err: CliError = CoreError::from(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "Validation error: quantity must be positive");
    }

    #[test]
    fn test_read_failed_names_the_path() {
        let err = CliError::ReadFailed {
            path: PathBuf::from("menu.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "Failed to read menu.toml: not found");
    }
}
