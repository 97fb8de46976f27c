//! Common error types for Quran Radio

use thiserror::Error;

/// Common result type for Quran Radio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Quran Radio crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    ///
    /// TOML parse failures land here too, with the offending file named.
    #[error("Configuration error: {0}")]
    Config(String),
}
