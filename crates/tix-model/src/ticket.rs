//! Per-ticket state derived from the event history.

use chrono::NaiveDateTime;

/// Owner, status, and lifecycle timestamps resolved from one ticket's history.
///
/// Every field is `None` when the history is missing, empty, or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTicketState {
    /// Owner declared by the most recent event that names one.
    pub owner_id: Option<i64>,
    /// Status of the newest event.
    pub status: Option<String>,
    /// Timestamp of the oldest timestamped event.
    pub created_at: Option<NaiveDateTime>,
    /// Timestamp of the latest `closed` event.
    pub closed_at: Option<NaiveDateTime>,
}

impl ResolvedTicketState {
    /// Returns true when nothing could be resolved.
    pub fn is_empty(&self) -> bool {
        self.owner_id.is_none()
            && self.status.is_none()
            && self.created_at.is_none()
            && self.closed_at.is_none()
    }
}
