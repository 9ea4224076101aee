//! CLI library components for the ticket analytics ETL.

pub mod config;
pub mod logging;
pub mod pipeline;
