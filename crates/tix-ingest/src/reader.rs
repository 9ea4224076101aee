//! Export file reading.
//!
//! Two layouts are accepted: a single JSON array of documents, or a stream of
//! documents one after another (newline-delimited or concatenated, as written
//! by `mongoexport`).

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tix_model::{RawStaff, RawTicket};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

/// Maximum export file size (2 GB).
pub const MAX_EXPORT_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

const UTF8_BOM: &str = "\u{feff}";

/// Locations of the two source collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub tickets: PathBuf,
    pub staff: PathBuf,
}

/// Both collections, fully loaded.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub tickets: Vec<RawTicket>,
    pub staff: Vec<RawStaff>,
}

/// Reads the ticket collection.
pub fn load_tickets(path: &Path) -> Result<Vec<RawTicket>> {
    read_documents(path, "ticket")
}

/// Reads the staff collection.
pub fn load_staff(path: &Path) -> Result<Vec<RawStaff>> {
    read_documents(path, "staff")
}

/// Reads both collections.
pub fn load_sources(paths: &SourcePaths) -> Result<SourceData> {
    Ok(SourceData {
        tickets: load_tickets(&paths.tickets)?,
        staff: load_staff(&paths.staff)?,
    })
}

/// Reads every document in an export file and deserializes it as `T`.
///
/// `kind` names the record type in error messages. Top-level values that
/// are not objects are skipped with a warning.
pub fn read_documents<T: DeserializeOwned>(path: &Path, kind: &'static str) -> Result<Vec<T>> {
    let start = Instant::now();
    let text = read_export_text(path)?;
    let values = parse_documents(path, &text)?;
    let mut documents = Vec::with_capacity(values.len());
    let mut skipped = 0usize;
    for (index, value) in values.into_iter().enumerate() {
        if !value.is_object() {
            warn!(
                path = %path.display(),
                index,
                kind,
                value = json_type(&value),
                "skipping non-object document"
            );
            skipped += 1;
            continue;
        }
        let document = serde_json::from_value(value).map_err(|e| IngestError::InvalidDocument {
            path: path.to_path_buf(),
            index,
            kind,
            message: e.to_string(),
        })?;
        documents.push(document);
    }
    info!(
        path = %path.display(),
        kind,
        documents = documents.len(),
        skipped,
        duration_ms = start.elapsed().as_millis(),
        "export loaded"
    );
    Ok(documents)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Splits export text into documents.
pub fn parse_documents(path: &Path, text: &str) -> Result<Vec<Value>> {
    let body = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let parse_error = |e: serde_json::Error| IngestError::JsonParse {
        path: path.to_path_buf(),
        line: e.line(),
        message: e.to_string(),
    };
    if body.trim_start().starts_with('[') {
        debug!(path = %path.display(), "reading JSON array export");
        return serde_json::from_str(body).map_err(parse_error);
    }
    debug!(path = %path.display(), "reading document stream export");
    serde_json::Deserializer::from_str(body)
        .into_iter::<Value>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(parse_error)
}

fn read_export_text(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).map_err(|e| file_error(path, e))?;
    if metadata.len() > MAX_EXPORT_FILE_SIZE {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_EXPORT_FILE_SIZE,
        });
    }
    let bytes = std::fs::read(path).map_err(|e| file_error(path, e))?;
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(unsupported(path, "UTF-16 LE"));
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(unsupported(path, "UTF-16 BE"));
    }
    String::from_utf8(bytes).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

fn file_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

fn unsupported(path: &Path, encoding: &'static str) -> IngestError {
    IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding,
    }
}
