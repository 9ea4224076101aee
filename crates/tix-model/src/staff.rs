//! Staff lookup keyed by owner identifier.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Projected staff record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffEntry {
    pub owner_id: i64,
    /// External document identifier of the staff record.
    pub external_ref: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
}

/// Deduplicated owner lookup table.
///
/// The first entry inserted for an owner id wins; later ones are rejected.
#[derive(Debug, Clone, Default)]
pub struct StaffIndex {
    entries: BTreeMap<i64, StaffEntry>,
}

impl StaffIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` unless its owner id is already present.
    ///
    /// Returns false when the entry was a duplicate and got dropped.
    pub fn insert_first(&mut self, entry: StaffEntry) -> bool {
        match self.entries.entry(entry.owner_id) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, owner_id: i64) -> Option<&StaffEntry> {
        self.entries.get(&owner_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
