//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] postmill_db::DbError),

    #[error("Unreadable archive: {0}")]
    Archive(String),

    #[error("Failed to read archive entry {name}: {message}")]
    ArchiveEntry { name: String, message: String },
}
