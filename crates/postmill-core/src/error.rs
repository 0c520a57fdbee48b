//! Error types for Postmill.

use thiserror::Error;

/// Core error type for Postmill operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type alias using Postmill's Error.
pub type Result<T> = std::result::Result<T, Error>;
