//! Ticket store export ingestion.
//!
//! Loads the `tickets` and `staffs` collections from export files into raw
//! records. Values stay in their Extended JSON form; decoding is left to the
//! transform.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tix_ingest::{SourcePaths, load_sources};
//!
//! let sources = load_sources(&SourcePaths {
//!     tickets: PathBuf::from("exports/tickets.json"),
//!     staff: PathBuf::from("exports/staffs.json"),
//! })?;
//! println!("{} tickets", sources.tickets.len());
//! ```

mod error;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use reader::{
    MAX_EXPORT_FILE_SIZE, SourceData, SourcePaths, load_sources, load_staff, load_tickets,
    parse_documents, read_documents,
};
