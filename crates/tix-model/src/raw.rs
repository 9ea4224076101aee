//! Raw documents as exported from the ticket store.
//!
//! Field values stay as [`serde_json::Value`] because the export mixes plain
//! scalars with Extended JSON wrappers (`{"$oid": ..}`, `{"$date": ..}`,
//! `{"$numberLong": ..}`). Decoding happens later, in one place.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One entry of a ticket's `activity_history`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEvent {
    /// Owner identifier (plain integer, string, or `$numberLong`).
    #[serde(default)]
    pub staff_id: Option<Value>,
    /// Status label recorded by the event.
    #[serde(default)]
    pub status: Option<Value>,
    /// Event timestamp (`$date` wrapper, ISO string, or epoch milliseconds).
    #[serde(default)]
    pub created_at: Option<Value>,
}

impl RawEvent {
    /// Builds an event from an arbitrary history element.
    ///
    /// Elements that are not objects carry no attributes.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

/// A ticket document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTicket {
    /// External document identifier (`_id`).
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    /// Display ticket number.
    #[serde(default)]
    pub ticket_id: Option<Value>,
    #[serde(default)]
    pub subject: Option<Value>,
    #[serde(default)]
    pub ticket_type: Option<Value>,
    /// Top-level status field, only consulted under a ticket status policy.
    #[serde(default)]
    pub status: Option<Value>,
    /// Event history in storage order, `None` when missing or not a list.
    #[serde(default, deserialize_with = "lenient_history")]
    pub activity_history: Option<Vec<RawEvent>>,
}

/// A staff document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawStaff {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    /// Integer owner identifier referenced by ticket events.
    #[serde(default)]
    pub staff_id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    /// Department label, stored as `role` in the source.
    #[serde(default)]
    pub role: Option<Value>,
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Option<Vec<RawEvent>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.into_iter().map(RawEvent::from_value).collect()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn history_that_is_not_a_list_is_absent() {
        let ticket: RawTicket =
            serde_json::from_value(json!({"_id": "t1", "activity_history": "oops"})).unwrap();
        assert!(ticket.activity_history.is_none());

        let ticket: RawTicket = serde_json::from_value(json!({"_id": "t1"})).unwrap();
        assert!(ticket.activity_history.is_none());
    }

    #[test]
    fn non_object_history_entries_become_empty_events() {
        let ticket: RawTicket = serde_json::from_value(json!({
            "_id": {"$oid": "65a0"},
            "activity_history": [
                42,
                {"status": "open", "staff_id": 7, "extra": true}
            ]
        }))
        .unwrap();
        let history = ticket.activity_history.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], RawEvent::default());
        assert_eq!(history[1].status, Some(json!("open")));
        assert_eq!(history[1].staff_id, Some(json!(7)));
    }

    #[test]
    fn staff_reads_role_and_wrapped_ids() {
        let staff: RawStaff = serde_json::from_value(json!({
            "_id": {"$oid": "5f1"},
            "staff_id": {"$numberLong": "12"},
            "name": "Mei",
            "role": "support"
        }))
        .unwrap();
        assert_eq!(staff.staff_id, Some(json!({"$numberLong": "12"})));
        assert_eq!(staff.role, Some(json!("support")));
    }
}
