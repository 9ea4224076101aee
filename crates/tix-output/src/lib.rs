//! Load boundary for the ticket analytics table.
//!
//! # Overview
//!
//! - **DDL** ([`ddl`]): validated, quoted `CREATE`/`DROP`/`INSERT` heads
//! - **PostgreSQL** ([`PostgresSink`]): transactional replace of the whole table
//! - **Export** ([`write_csv`], [`rows_to_frame`]): DataFrame and CSV views of the rows

mod csv;
mod error;
mod frame;
mod postgres;

pub mod ddl;

pub use csv::write_csv;
pub use ddl::{create_table_sql, drop_table_sql, quote_identifier, validate_table_name};
pub use error::{OutputError, Result};
pub use frame::{TIMESTAMP_FORMAT, rows_to_frame};
pub use postgres::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, PostgresConfig, PostgresSink};
