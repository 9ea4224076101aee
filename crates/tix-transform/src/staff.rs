//! Projection of staff documents into the owner lookup table.

use tix_model::{RawStaff, StaffEntry, StaffIndex};
use tracing::debug;

use crate::scalar::normalize_field;

/// Owner lookup table plus counts of the records that did not make it in.
#[derive(Debug, Clone, Default)]
pub struct StaffProjection {
    pub index: StaffIndex,
    /// Records dropped because an earlier record had the same owner id.
    pub duplicates: usize,
    /// Records dropped because their owner id is not an integer.
    pub unparseable: usize,
}

/// Builds the staff index; the first record seen for an owner id wins.
pub fn project_staff(staff: &[RawStaff]) -> StaffProjection {
    let mut projection = StaffProjection::default();
    for (position, record) in staff.iter().enumerate() {
        let Some(entry) = project_record(record) else {
            debug!(position, "staff record has no integer staff_id, skipped");
            projection.unparseable += 1;
            continue;
        };
        let owner_id = entry.owner_id;
        if !projection.index.insert_first(entry) {
            debug!(position, owner_id, "duplicate staff_id, keeping first record");
            projection.duplicates += 1;
        }
    }
    projection
}

fn project_record(record: &RawStaff) -> Option<StaffEntry> {
    let owner_id = normalize_field(record.staff_id.as_ref()).as_i64()?;
    Some(StaffEntry {
        owner_id,
        external_ref: normalize_field(record.id.as_ref()).to_text(),
        name: normalize_field(record.name.as_ref()).to_text(),
        department: normalize_field(record.role.as_ref()).to_text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn staff(id: &str, staff_id: serde_json::Value, name: &str) -> RawStaff {
        RawStaff {
            id: Some(json!({"$oid": id})),
            staff_id: Some(staff_id),
            name: Some(json!(name)),
            role: Some(json!("support")),
        }
    }

    #[test]
    fn first_record_wins_on_duplicate_ids() {
        let records = vec![
            staff("a1", json!(5), "Ana"),
            staff("b2", json!({"$numberLong": "5"}), "Ben"),
            staff("c3", json!(6), "Cai"),
        ];
        let projection = project_staff(&records);
        assert_eq!(projection.index.len(), 2);
        assert_eq!(projection.duplicates, 1);
        let kept = projection.index.get(5).unwrap();
        assert_eq!(kept.name.as_deref(), Some("Ana"));
        assert_eq!(kept.external_ref.as_deref(), Some("a1"));
        assert_eq!(kept.department.as_deref(), Some("support"));
    }

    #[test]
    fn non_integer_ids_are_dropped() {
        let mut missing = staff("d4", json!(null), "Dee");
        missing.staff_id = None;
        let records = vec![staff("c3", json!("abc"), "Cai"), missing];
        let projection = project_staff(&records);
        assert!(projection.index.is_empty());
        assert_eq!(projection.unparseable, 2);
    }
}
