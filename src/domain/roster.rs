//! Ordered broker collection backing the roster page.
//!
//! The index of an entry is its rank. Identifiers are unique: every
//! constructor goes through [`dedup_by_id`].

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::makler::{Makler, PositionAssignment, ReorderPayload};
use crate::domain::types::{MaklerId, Position, RenderKey};

/// A broker together with the key its row is rendered under.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RosterEntry {
    pub key: RenderKey,
    pub makler: Makler,
}

impl RosterEntry {
    pub fn id(&self) -> MaklerId {
        self.makler.id
    }
}

/// Drops every record whose id was already seen, keeping the first occurrence.
///
/// Returns the surviving records in their original relative order and the
/// number of dropped duplicates.
pub fn dedup_by_id(records: Vec<Makler>) -> (Vec<Makler>, usize) {
    let total = records.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Makler> = records
        .into_iter()
        .filter(|makler| seen.insert(makler.id))
        .collect();
    let dropped = total - unique.len();
    (unique, dropped)
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct OrderedRoster {
    entries: Vec<RosterEntry>,
}

impl OrderedRoster {
    /// Builds a roster from a service response, deduplicating by id and
    /// assigning fresh render keys.
    pub fn from_records(records: Vec<Makler>) -> (Self, usize) {
        let (unique, dropped) = dedup_by_id(records);
        let entries = unique
            .into_iter()
            .map(|makler| RosterEntry {
                key: RenderKey::generate(),
                makler,
            })
            .collect();
        (Self { entries }, dropped)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RosterEntry> {
        self.entries.get(index)
    }

    /// Identifiers in rank order.
    pub fn ids(&self) -> Vec<MaklerId> {
        self.entries.iter().map(RosterEntry::id).collect()
    }

    /// Whether both rosters list the same ids in the same order.
    pub fn same_order(&self, other: &OrderedRoster) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.id() == b.id())
    }

    /// Removes the entry at `from` and reinserts it at `to`.
    ///
    /// Entries between the two indices shift by one. Returns `false` and leaves
    /// the roster untouched when either index is out of range.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        if from != to {
            let entry = self.entries.remove(from);
            self.entries.insert(to, entry);
        }
        true
    }

    /// Projects the current order onto consecutive 1-based positions.
    ///
    /// Ids already assigned earlier in the pass are skipped, so the result
    /// never contains gaps or duplicates.
    pub fn position_payload(&self) -> ReorderPayload {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut position = Position::FIRST;
        let mut positions = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !seen.insert(entry.id()) {
                continue;
            }
            positions.push(PositionAssignment {
                makler_id: entry.id(),
                position,
            });
            position = position.next();
        }
        ReorderPayload { positions }
    }
}
