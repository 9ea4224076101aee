//! DataFrame view of the sanitized table.

use ::chrono::NaiveDateTime;
use polars::prelude::*;
use tix_model::OutputRow;
use tix_model::schema::{
    CURRENT_STAFF_ID, CURRENT_STATUS, HANDLE_DURATION_MINS, MONGO_TICKET_ID, STAFF_DEPARTMENT,
    STAFF_NAME, SUBJECT, TICKET_CLOSED_AT, TICKET_CREATED_AT, TICKET_ID, TICKET_TYPE,
};

use crate::error::Result;

/// Text rendering of timestamp cells.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Builds a DataFrame with one column per table column, in table order.
///
/// Timestamps are rendered as text; absent values are null cells.
pub fn rows_to_frame(rows: &[OutputRow]) -> Result<DataFrame> {
    let ids: Vec<&str> = rows.iter().map(|row| row.mongo_ticket_id.as_str()).collect();
    let columns = vec![
        Column::new(MONGO_TICKET_ID.name.into(), ids),
        int_column(TICKET_ID.name, rows, |row| row.ticket_id),
        text_column(SUBJECT.name, rows, |row| row.subject.as_deref()),
        text_column(TICKET_TYPE.name, rows, |row| row.ticket_type.as_deref()),
        text_column(CURRENT_STATUS.name, rows, |row| row.current_status.as_deref()),
        timestamp_column(TICKET_CREATED_AT.name, rows, |row| row.ticket_created_at),
        timestamp_column(TICKET_CLOSED_AT.name, rows, |row| row.ticket_closed_at),
        int_column(CURRENT_STAFF_ID.name, rows, |row| row.current_staff_id),
        text_column(STAFF_NAME.name, rows, |row| row.staff_name.as_deref()),
        text_column(STAFF_DEPARTMENT.name, rows, |row| row.staff_department.as_deref()),
        Column::new(
            HANDLE_DURATION_MINS.name.into(),
            rows.iter()
                .map(|row| row.handle_duration_mins)
                .collect::<Vec<Option<f64>>>(),
        ),
    ];
    Ok(DataFrame::new(columns)?)
}

fn text_column<'a>(
    name: &str,
    rows: &'a [OutputRow],
    value: impl Fn(&'a OutputRow) -> Option<&'a str>,
) -> Column {
    let values: Vec<Option<&str>> = rows.iter().map(value).collect();
    Column::new(name.into(), values)
}

fn int_column(name: &str, rows: &[OutputRow], value: impl Fn(&OutputRow) -> Option<i64>) -> Column {
    let values: Vec<Option<i64>> = rows.iter().map(value).collect();
    Column::new(name.into(), values)
}

fn timestamp_column(
    name: &str,
    rows: &[OutputRow],
    value: impl Fn(&OutputRow) -> Option<NaiveDateTime>,
) -> Column {
    let values: Vec<Option<String>> = rows
        .iter()
        .map(|row| value(row).map(|ts| ts.format(TIMESTAMP_FORMAT).to_string()))
        .collect();
    Column::new(name.into(), values)
}
