//! Batch-level transform failures.

use thiserror::Error;

/// Errors that reject a whole batch.
///
/// Problems inside a single record never surface here; they resolve to null
/// values instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// A source collection produced no records.
    #[error("source collection `{collection}` is empty")]
    EmptySource { collection: &'static str },

    /// A ticket has no usable external identifier.
    #[error("ticket at position {position} has no external id")]
    MissingTicketId { position: usize },

    /// A ticket's external identifier is wider than its key column.
    #[error("ticket id `{id}` at position {position} exceeds {max_chars} characters")]
    TicketIdTooLong {
        id: String,
        position: usize,
        max_chars: usize,
    },

    /// Two tickets share an external identifier.
    #[error("duplicate ticket id `{id}` at positions {first} and {second}")]
    DuplicateTicketId {
        id: String,
        first: usize,
        second: usize,
    },
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
