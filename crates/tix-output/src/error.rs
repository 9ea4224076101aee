//! Error types for the load boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering, exporting, or loading the output table.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Table name is not a plain SQL identifier.
    #[error("invalid table name {name:?}: {reason}")]
    InvalidTableName { name: String, reason: &'static str },

    /// Insert batch size outside the supported range.
    #[error("invalid batch size {size}: must be between 1 and {max}")]
    InvalidBatchSize { size: usize, max: usize },

    /// Connection settings cannot be used.
    #[error("invalid postgres configuration: {message}")]
    InvalidConfig { message: String },

    /// Could not reach the database.
    #[error("failed to connect to postgres after {attempts} attempt(s): {source}")]
    Connect {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    /// A statement of the load transaction failed; nothing was committed.
    #[error("failed to {stage} table {table}: {source}")]
    Load {
        table: String,
        stage: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// DataFrame construction or CSV serialization failed.
    #[error("dataframe operation failed: {0}")]
    Frame(#[from] polars::error::PolarsError),

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
