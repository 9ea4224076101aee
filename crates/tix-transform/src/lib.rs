//! Ticket analytics transform.
//!
//! Turns raw ticket and staff documents into rows of the `tickets_analysis`
//! table.
//!
//! # Overview
//!
//! - **Scalar decoding** ([`scalar`]): Extended JSON wrappers to native values
//! - **History resolution** ([`history`]): owner, status, creation, and closure per ticket
//! - **Staff projection** ([`staff`]): deduplicated owner lookup table
//! - **Join** ([`join`]): ticket + staff attributes + handling duration
//! - **Sanitization** ([`sanitize`]): strict, null-safe column coercion
//!
//! # Example
//!
//! ```ignore
//! use tix_transform::{TransformOptions, transform_batch};
//!
//! let output = transform_batch(&tickets, &staff, &TransformOptions::default())?;
//! for row in &output.rows {
//!     println!("{} {:?}", row.mongo_ticket_id, row.current_status);
//! }
//! ```

mod error;
mod pipeline;

pub mod history;
pub mod join;
pub mod sanitize;
pub mod scalar;
pub mod staff;

pub use error::{Result, TransformError};
pub use history::resolve_history;
pub use join::{JoinedRecord, handle_duration_mins, join_ticket};
pub use pipeline::{
    STAFF_COLLECTION, TICKETS_COLLECTION, TransformOutput, TransformSummary, transform_batch,
};
pub use sanitize::{resanitize, sanitize_record, ticket_id_fits};
pub use scalar::{Scalar, normalize_scalar};
pub use staff::{StaffProjection, project_staff};
pub use tix_model::{StatusSource, TransformOptions};
