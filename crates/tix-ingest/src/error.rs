//! Error types for reading ticket store exports.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an export file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Export file not found.
    #[error("export file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File is not UTF-8.
    #[error("unsupported encoding {encoding} in {path}; export as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parse Errors ===
    /// The file is not valid JSON.
    #[error("failed to parse JSON {path} at line {line}: {message}")]
    JsonParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A document does not have the expected shape.
    #[error("document {index} in {path} is not a valid {kind} record: {message}")]
    InvalidDocument {
        path: PathBuf,
        index: usize,
        kind: &'static str,
        message: String,
    },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
