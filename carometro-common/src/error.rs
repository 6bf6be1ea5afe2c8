//! Common error types for Carômetro

use thiserror::Error;

/// Common result type for Carômetro operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Carômetro crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Student id or name unusable as part of a file name
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
