//! Change notifications returned from every engine call.
//!
//! A [`ChangeSet`] deduplicates: a field touched several times while one
//! datagram is applied is reported once.

use serde::Serialize;
use std::collections::BTreeSet;

/// Which part of a driver slot moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DriverField {
    Presence,
    Identity,
    Name,
    Position,
    Status,
    Laps,
    FastestLap,
    Tyres,
    Damage,
    Wear,
    Penalties,
    Delta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Change {
    /// All state was cleared (new session uid, `SSTA`, or an explicit reset).
    Reset,
    Session,
    /// A new entry was appended to the session event list at this index.
    EventAppended(usize),
    ClassificationAvailable,
    Driver(usize, DriverField),
    /// The UDP action button went from released to pressed.
    UdpAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: BTreeSet<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.insert(change);
    }

    /// Record `change` when `changed` is set; returns `changed`.
    pub(crate) fn mark(&mut self, changed: bool, change: Change) -> bool {
        if changed {
            self.push(change);
        }
        changed
    }

    pub fn extend(&mut self, other: ChangeSet) {
        self.changes.extend(other.changes);
    }

    pub fn contains(&self, change: &Change) -> bool {
        self.changes.contains(change)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    /// Distinct driver slots with at least one change.
    pub fn drivers(&self) -> BTreeSet<usize> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                Change::Driver(idx, _) => Some(*idx),
                _ => None,
            })
            .collect()
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::collections::btree_set::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::collections::btree_set::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl FromIterator<Change> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

/// Store `value` in `slot`; true when it differed.
pub(crate) fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_changes_are_reported_once() {
        let mut set = ChangeSet::new();
        set.push(Change::Driver(3, DriverField::Laps));
        set.push(Change::Driver(3, DriverField::Laps));
        set.push(Change::Driver(3, DriverField::Delta));
        set.push(Change::Session);
        assert_eq!(set.len(), 3);
        assert_eq!(set.drivers().into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn mark_only_records_real_changes() {
        let mut set = ChangeSet::new();
        assert!(!set.mark(false, Change::Session));
        assert!(set.is_empty());
        assert!(set.mark(true, Change::Session));
        assert!(set.contains(&Change::Session));
    }

    #[test]
    fn assign_reports_difference() {
        let mut v = 3u8;
        assert!(!assign(&mut v, 3));
        assert!(assign(&mut v, 4));
        assert_eq!(v, 4);
    }
}
