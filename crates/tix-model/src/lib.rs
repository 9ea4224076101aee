//! Data model for the ticket analytics ETL.
//!
//! Raw documents read from the ticket store, the state derived from them, and
//! the strictly typed rows handed to the relational sink.

pub mod options;
pub mod raw;
pub mod row;
pub mod schema;
pub mod staff;
pub mod ticket;

pub use options::{StatusSource, TransformOptions};
pub use raw::{RawEvent, RawStaff, RawTicket};
pub use row::OutputRow;
pub use schema::{ColumnDef, ColumnKind, DEFAULT_TABLE_NAME, TICKETS_ANALYSIS_COLUMNS};
pub use staff::{StaffEntry, StaffIndex};
pub use ticket::ResolvedTicketState;
