//! `VarSet`: the set of environment entries definitely initialized at some
//! program point.
//!
//! Backed by a bitset indexed by `EntryId`, per the arena design in the
//! data model notes — union/intersect/contains are then O(words) instead of
//! O(entries) hash-set operations. A `VarSet` is immutable after
//! construction; every operation returns a new set rather than mutating in
//! place, matching init analysis's functional `analyze(in) -> out` shape.

use bit_set::BitSet;
use minic_ast::EntryId;
use minic_util::Idx;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSet {
    bits: BitSet,
}

impl VarSet {
    pub fn empty() -> Self {
        VarSet { bits: BitSet::new() }
    }

    pub fn contains(&self, entry: EntryId) -> bool {
        self.bits.contains(entry.index())
    }

    /// Returns a new set with `entry` added.
    pub fn add(&self, entry: EntryId) -> Self {
        let mut bits = self.bits.clone();
        bits.insert(entry.index());
        VarSet { bits }
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut bits = self.bits.clone();
        bits.union_with(&other.bits);
        VarSet { bits }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let mut bits = self.bits.clone();
        bits.intersect_with(&other.bits);
        VarSet { bits }
    }

    /// Removes every entry also present in `baseline` — used to isolate the
    /// variables an `If` branch newly initialized, beyond what was already
    /// true on entry to the branch.
    pub fn trim(&self, baseline: &Self) -> Self {
        let mut bits = self.bits.clone();
        bits.difference_with(&baseline.bits);
        VarSet { bits }
    }
}

impl Default for VarSet {
    fn default() -> Self {
        Self::empty()
    }
}
