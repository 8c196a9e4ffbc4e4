//! The cross-stage value table `X` (§3 "Cross-stage table X").

use ahash::AHashMap;

use crate::features::pipelining::ports::Rewriter;

/// How many stages a value defined in the body must survive before its last
/// use, and where it was defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossStageEntry {
    pub def_stage: usize,
    pub last_use_stage: usize,
}

impl CrossStageEntry {
    /// Number of distinct kernel iter-arg slots this value needs:
    /// `lastUseStage - defStage`.
    pub fn version_count(&self) -> usize {
        self.last_use_stage - self.def_stage
    }
}

pub struct CrossStageTable<R: Rewriter> {
    entries: AHashMap<R::Value, CrossStageEntry>,
}

impl<R: Rewriter> CrossStageTable<R> {
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Record that `value`, defined at `def_stage`, has a use at `use_stage`.
    /// Only `use_stage > def_stage` is meaningful; callers are expected to
    /// have already filtered out same-stage and carry-compensated uses.
    pub fn record_use(&mut self, value: R::Value, def_stage: usize, use_stage: usize) {
        debug_assert!(use_stage > def_stage);
        let entry = self
            .entries
            .entry(value)
            .or_insert(CrossStageEntry {
                def_stage,
                last_use_stage: use_stage,
            });
        entry.last_use_stage = entry.last_use_stage.max(use_stage);
    }

    pub fn get(&self, value: &R::Value) -> Option<&CrossStageEntry> {
        self.entries.get(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R::Value, &CrossStageEntry)> {
        self.entries.iter()
    }

    /// Total number of new iter-args the kernel loop must add for all
    /// tracked values (§8 "Version budget" property).
    pub fn total_version_count(&self) -> usize {
        self.entries.values().map(|e| e.version_count()).sum()
    }
}

impl<R: Rewriter> Default for CrossStageTable<R> {
    fn default() -> Self {
        Self::new()
    }
}
