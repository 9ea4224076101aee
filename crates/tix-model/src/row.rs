//! Finalized analytics row.

use chrono::NaiveDateTime;

/// One sanitized row of the analytics table, fields in load order.
///
/// String fields never hold control characters, NUL bytes, empty strings, or
/// null-like literals; `handle_duration_mins` is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub mongo_ticket_id: String,
    pub ticket_id: Option<i64>,
    pub subject: Option<String>,
    pub ticket_type: Option<String>,
    pub current_status: Option<String>,
    pub ticket_created_at: Option<NaiveDateTime>,
    pub ticket_closed_at: Option<NaiveDateTime>,
    pub current_staff_id: Option<i64>,
    pub staff_name: Option<String>,
    pub staff_department: Option<String>,
    pub handle_duration_mins: Option<f64>,
}

impl OutputRow {
    /// Row holding only the external identifier.
    pub fn new(mongo_ticket_id: impl Into<String>) -> Self {
        Self {
            mongo_ticket_id: mongo_ticket_id.into(),
            ticket_id: None,
            subject: None,
            ticket_type: None,
            current_status: None,
            ticket_created_at: None,
            ticket_closed_at: None,
            current_staff_id: None,
            staff_name: None,
            staff_department: None,
            handle_duration_mins: None,
        }
    }
}
