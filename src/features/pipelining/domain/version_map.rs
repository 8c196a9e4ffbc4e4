//! The value-version map `V` (§3 "Value-version map V").
//!
//! Each original value maps to a fixed-length vector of `S + 1` optional
//! replacement values. Reads of an empty slot are a bug in the caller, not a
//! recoverable condition - they assert rather than silently returning a
//! default, per the data model invariant that every read is preceded by a
//! write that populates it.

use ahash::AHashMap;

use crate::features::pipelining::ports::Rewriter;

pub struct VersionMap<R: Rewriter> {
    slots: AHashMap<R::Value, Vec<Option<R::Value>>>,
    width: usize,
}

impl<R: Rewriter> VersionMap<R> {
    /// `width` is `S + 1`: the number of version slots per tracked value.
    pub fn new(width: usize) -> Self {
        Self {
            slots: AHashMap::new(),
            width,
        }
    }

    fn row_mut(&mut self, original: &R::Value) -> &mut Vec<Option<R::Value>> {
        self.slots
            .entry(original.clone())
            .or_insert_with(|| vec![None; self.width])
    }

    pub fn set(&mut self, original: &R::Value, index: usize, replacement: R::Value) {
        debug_assert!(
            index < self.width,
            "version map index {index} out of bounds (width {})",
            self.width
        );
        let row = self.row_mut(original);
        row[index] = Some(replacement);
    }

    pub fn get(&self, original: &R::Value, index: usize) -> Option<&R::Value> {
        self.slots
            .get(original)
            .and_then(|row| row.get(index))
            .and_then(|slot| slot.as_ref())
    }

    /// Like [`VersionMap::get`], but asserts the slot is populated. Use this
    /// at every point the algorithm relies on a version having already been
    /// produced by an earlier phase.
    pub fn require(&self, original: &R::Value, index: usize) -> &R::Value {
        self.get(original, index).unwrap_or_else(|| {
            panic!("version map: missing slot {index} for {original:?} (empty slots must never be read)")
        })
    }

    pub fn contains(&self, original: &R::Value, index: usize) -> bool {
        self.get(original, index).is_some()
    }
}
