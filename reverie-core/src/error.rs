//! Error types for the reverie core library.
//!
//! The memory core itself never fails mid-cycle — capacity overflow,
//! empty input, and sub-threshold experiences all degrade to empty or
//! default results.  Errors exist only at the configuration boundary.

use thiserror::Error;

/// Top-level error type for reverie operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration parse or validation failure.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error (config file loading).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CoreError>;
