//! The loop-arg map `L` (§3 "Loop-arg map L").

use ahash::AHashMap;

use crate::features::pipelining::ports::Rewriter;

/// Maps `(value, k)` -> the position in the new kernel loop's iter-arg list
/// holding the version of `value` that is `k` iterations old, for
/// `1 <= k <= lastUseStage - defStage`.
pub struct LoopArgMap<R: Rewriter> {
    positions: AHashMap<(R::Value, usize), usize>,
}

impl<R: Rewriter> LoopArgMap<R> {
    pub fn new() -> Self {
        Self {
            positions: AHashMap::new(),
        }
    }

    pub fn insert(&mut self, value: R::Value, age: usize, position: usize) {
        self.positions.insert((value, age), position);
    }

    pub fn get(&self, value: &R::Value, age: usize) -> Option<usize>
    where
        R::Value: Clone,
    {
        self.positions.get(&(value.clone(), age)).copied()
    }

    pub fn require(&self, value: &R::Value, age: usize) -> usize
    where
        R::Value: Clone,
    {
        self.get(value, age).unwrap_or_else(|| {
            panic!("loop-arg map: missing position for {value:?} at age {age}")
        })
    }
}

impl<R: Rewriter> Default for LoopArgMap<R> {
    fn default() -> Self {
        Self::new()
    }
}
