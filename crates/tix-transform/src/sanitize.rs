//! Coercion of joined records into strictly typed output rows.
//!
//! Every column goes through the same closed pipeline: null-like values
//! collapse to `None`, strings lose control characters, timestamps and numbers
//! are parsed into their column type. No step can fail, and running the
//! pipeline on its own output changes nothing.

use chrono::{Datelike, NaiveDateTime};
use tix_model::schema::{
    CURRENT_STATUS, HANDLE_DURATION_MINS, MONGO_TICKET_ID, STAFF_DEPARTMENT, STAFF_NAME, SUBJECT,
    TICKET_TYPE,
};
use tix_model::{ColumnDef, OutputRow};

use crate::join::JoinedRecord;
use crate::scalar::{Scalar, parse_timestamp};

/// String values that stand for a missing value.
pub const NULL_LITERALS: &[&str] = &["None", "null", "NULL"];

/// Earliest year PostgreSQL can store in a TIMESTAMP column (4713 BC).
const MIN_TIMESTAMP_YEAR: i32 = -4712;

/// True for control characters removed from string columns.
///
/// Tab, line feed, and carriage return are kept.
pub fn is_stripped_control(ch: char) -> bool {
    matches!(ch, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Removes NUL bytes and stripped control characters.
pub fn strip_control_chars(value: &str) -> String {
    value.chars().filter(|ch| !is_stripped_control(*ch)).collect()
}

/// Empty strings and null literals.
pub fn is_null_text(value: &str) -> bool {
    value.is_empty() || NULL_LITERALS.contains(&value)
}

/// Null, NaN, or a null-like string.
pub fn is_absent(value: &Scalar) -> bool {
    match value {
        Scalar::Text(text) => is_null_text(text),
        other => other.is_null(),
    }
}

/// Coerces a value for a string column, truncating to `max_chars` if given.
pub fn sanitize_text(value: &Scalar, max_chars: Option<usize>) -> Option<String> {
    if is_absent(value) {
        return None;
    }
    let mut text = strip_control_chars(&value.to_text()?);
    if let Some(limit) = max_chars
        && text.chars().count() > limit
    {
        text = text.chars().take(limit).collect();
    }
    (!is_null_text(&text)).then_some(text)
}

/// Coerces a value for a TIMESTAMP column.
pub fn sanitize_timestamp(value: &Scalar) -> Option<NaiveDateTime> {
    if is_absent(value) {
        return None;
    }
    let parsed = match value {
        Scalar::Text(text) => parse_timestamp(&strip_control_chars(text)),
        other => other.as_timestamp(),
    }?;
    (parsed.year() >= MIN_TIMESTAMP_YEAR).then_some(parsed)
}

/// Coerces a value for a BIGINT column; out-of-range and fractional values
/// become `None`.
pub fn sanitize_bigint(value: &Scalar) -> Option<i64> {
    if is_absent(value) {
        return None;
    }
    match value {
        Scalar::Text(text) => Scalar::Text(strip_control_chars(text)).as_i64(),
        other => other.as_i64(),
    }
}

/// Coerces a value for a NUMERIC column; only finite values survive.
pub fn sanitize_numeric(value: &Scalar, column: ColumnDef) -> Option<f64> {
    if is_absent(value) {
        return None;
    }
    let number = match value {
        Scalar::Text(text) => Scalar::Text(strip_control_chars(text)).as_f64(),
        other => other.as_f64(),
    }?;
    (!column.non_negative || number >= 0.0).then_some(number)
}

fn sanitize_string_column(value: &Scalar, column: ColumnDef) -> Option<String> {
    sanitize_text(value, column.kind.max_chars())
}

/// Sanitizes a joined record.
///
/// Returns `None` when the external ticket id is missing after sanitization;
/// such a record cannot be loaded. The id is never truncated, so it may
/// still exceed [`MONGO_TICKET_ID`]'s width (see [`ticket_id_fits`]).
///
/// The duration survives only while both sanitized timestamps do.
pub fn sanitize_record(record: &JoinedRecord) -> Option<OutputRow> {
    let mongo_ticket_id = sanitize_text(&record.mongo_ticket_id, None)?;
    let ticket_created_at = sanitize_timestamp(&record.ticket_created_at);
    let ticket_closed_at = sanitize_timestamp(&record.ticket_closed_at);
    let handle_duration_mins = ticket_created_at
        .and(ticket_closed_at)
        .and_then(|_| sanitize_numeric(&record.handle_duration_mins, HANDLE_DURATION_MINS));
    Some(OutputRow {
        mongo_ticket_id,
        ticket_id: sanitize_bigint(&record.ticket_id),
        subject: sanitize_string_column(&record.subject, SUBJECT),
        ticket_type: sanitize_string_column(&record.ticket_type, TICKET_TYPE),
        current_status: sanitize_string_column(&record.current_status, CURRENT_STATUS),
        ticket_created_at,
        ticket_closed_at,
        current_staff_id: sanitize_bigint(&record.current_staff_id),
        staff_name: sanitize_string_column(&record.staff_name, STAFF_NAME),
        staff_department: sanitize_string_column(&record.staff_department, STAFF_DEPARTMENT),
        handle_duration_mins,
    })
}

/// Whether a sanitized external id fits its primary key column.
pub fn ticket_id_fits(id: &str) -> bool {
    MONGO_TICKET_ID
        .kind
        .max_chars()
        .is_none_or(|limit| id.chars().count() <= limit)
}

/// Runs an already sanitized row through the pipeline again.
pub fn resanitize(row: &OutputRow) -> Option<OutputRow> {
    sanitize_record(&JoinedRecord::from(row))
}
