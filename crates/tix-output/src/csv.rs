//! CSV export of the sanitized table.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;
use tix_model::OutputRow;
use tracing::info;

use crate::error::{OutputError, Result};
use crate::frame::rows_to_frame;

/// Writes the rows to `path` as CSV with a header line.
///
/// Parent directories are created as needed. Returns the number of rows
/// written.
pub fn write_csv(rows: &[OutputRow], path: &Path) -> Result<usize> {
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut frame = rows_to_frame(rows)?;
    let mut file = File::create(path).map_err(io_error)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)?;
    info!(path = %path.display(), rows = frame.height(), "csv export written");
    Ok(frame.height())
}
