//! Resolution of a ticket's current state from its event history.

use chrono::NaiveDateTime;
use tix_model::{RawEvent, ResolvedTicketState};

use crate::scalar::{Scalar, normalize_field};

/// Status label that marks a closing event.
pub const CLOSED_STATUS: &str = "closed";

/// An event paired with its decoded timestamp.
struct TimedEvent<'a> {
    at: Option<NaiveDateTime>,
    event: &'a RawEvent,
}

/// Derives owner, status, creation, and closure from an event history.
///
/// Events are ordered newest first by timestamp; the sort is stable and
/// events without a usable timestamp sort as the oldest. An empty or missing
/// history resolves to an empty state.
pub fn resolve_history(events: Option<&[RawEvent]>) -> ResolvedTicketState {
    let Some(events) = events.filter(|events| !events.is_empty()) else {
        return ResolvedTicketState::default();
    };

    let mut timeline: Vec<TimedEvent<'_>> = events
        .iter()
        .map(|event| TimedEvent {
            at: normalize_field(event.created_at.as_ref()).as_timestamp(),
            event,
        })
        .collect();
    // `None < Some`, so a descending sort leaves untimestamped events last.
    timeline.sort_by(|left, right| right.at.cmp(&left.at));

    let owner_id = timeline.iter().find_map(|timed| event_owner(timed.event));
    let status = timeline
        .first()
        .and_then(|timed| event_status(timed.event));
    let created_at = timeline.iter().rev().find_map(|timed| timed.at);
    let closed_at = timeline
        .iter()
        .filter(|timed| event_status(timed.event).as_deref() == Some(CLOSED_STATUS))
        .find_map(|timed| timed.at);

    ResolvedTicketState {
        owner_id,
        status,
        created_at,
        closed_at,
    }
}

/// Owner declared by an event, if it is present and integral.
fn event_owner(event: &RawEvent) -> Option<i64> {
    match normalize_field(event.staff_id.as_ref()) {
        value if value.is_null() => None,
        value => value.as_i64(),
    }
}

fn event_status(event: &RawEvent) -> Option<String> {
    match normalize_field(event.status.as_ref()) {
        Scalar::Null => None,
        value => value.to_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn event(created_at: Option<Value>, staff_id: Option<Value>, status: &str) -> RawEvent {
        RawEvent {
            staff_id,
            status: Some(json!(status)),
            created_at,
        }
    }

    fn millis(ms: i64) -> Option<Value> {
        Some(json!({"$date": {"$numberLong": ms.to_string()}}))
    }

    fn instant(ms: i64) -> Option<NaiveDateTime> {
        crate::scalar::timestamp_from_millis(ms)
    }

    #[test]
    fn empty_history_resolves_to_nothing() {
        assert!(resolve_history(None).is_empty());
        assert!(resolve_history(Some(&[][..])).is_empty());
    }

    #[test]
    fn owner_comes_from_most_recent_declaring_event() {
        let events = vec![
            event(millis(10), None, "pending"),
            event(millis(20), Some(json!(5)), "assigned"),
            event(millis(5), Some(json!(7)), "open"),
        ];
        let state = resolve_history(Some(events.as_slice()));
        assert_eq!(state.owner_id, Some(5));
        assert_eq!(state.status.as_deref(), Some("assigned"));
        assert_eq!(state.created_at, instant(5));
        assert_eq!(state.closed_at, None);
    }

    #[test]
    fn status_is_newest_event_even_without_owner() {
        let events = vec![
            event(millis(10), Some(json!({"$numberLong": "3"})), "open"),
            event(millis(30), None, "waiting"),
        ];
        let state = resolve_history(Some(events.as_slice()));
        assert_eq!(state.owner_id, Some(3));
        assert_eq!(state.status.as_deref(), Some("waiting"));
    }

    #[test]
    fn closed_at_is_latest_closing_event() {
        let events = vec![
            event(millis(30), None, "closed"),
            event(millis(40), None, "reopened"),
            event(millis(50), None, "closed"),
            event(millis(1), None, "open"),
        ];
        let state = resolve_history(Some(events.as_slice()));
        assert_eq!(state.closed_at, instant(50));
        assert_eq!(state.created_at, instant(1));
        assert_eq!(state.status.as_deref(), Some("closed"));
    }

    #[test]
    fn closed_match_is_exact() {
        let events = vec![event(millis(30), None, "Closed")];
        assert_eq!(resolve_history(Some(events.as_slice())).closed_at, None);
    }

    #[test]
    fn untimestamped_events_sort_as_oldest() {
        let events = vec![
            event(None, Some(json!(9)), "draft"),
            event(millis(20), None, "open"),
        ];
        let state = resolve_history(Some(events.as_slice()));
        assert_eq!(state.status.as_deref(), Some("open"));
        assert_eq!(state.owner_id, Some(9));
        assert_eq!(state.created_at, instant(20));
    }

    #[test]
    fn equal_timestamps_keep_storage_order() {
        let events = vec![
            event(millis(20), Some(json!(1)), "first"),
            event(millis(20), Some(json!(2)), "second"),
        ];
        let state = resolve_history(Some(events.as_slice()));
        assert_eq!(state.owner_id, Some(1));
        assert_eq!(state.status.as_deref(), Some("first"));
    }

    #[test]
    fn non_integer_owner_is_skipped() {
        let events = vec![
            event(millis(20), Some(json!("unassigned")), "open"),
            event(millis(10), Some(json!("4")), "new"),
        ];
        assert_eq!(resolve_history(Some(events.as_slice())).owner_id, Some(4));
    }

    #[test]
    fn all_untimestamped_history_has_no_created_at() {
        let events = vec![RawEvent::default(), event(None, None, "closed")];
        let state = resolve_history(Some(events.as_slice()));
        assert_eq!(state.created_at, None);
        assert_eq!(state.closed_at, None);
        assert_eq!(state.status, None);
    }
}
