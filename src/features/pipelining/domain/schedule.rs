//! Stage assignment (§3 "Stage assignment").

use ahash::AHashMap;

use crate::features::pipelining::ports::Rewriter;

/// The user-supplied (or oracle-supplied) mapping from body op to pipeline
/// stage, plus the emission order within one kernel iteration.
pub struct Schedule<R: Rewriter> {
    stages: AHashMap<R::Op, usize>,
    op_order: Vec<R::Op>,
    max_stage: usize,
}

impl<R: Rewriter> Schedule<R> {
    pub fn new(assignments: Vec<(R::Op, usize)>) -> Self {
        let op_order: Vec<R::Op> = assignments.iter().map(|(op, _)| op.clone()).collect();
        let mut stages = AHashMap::new();
        let mut max_stage = 0;
        for (op, stage) in assignments {
            max_stage = max_stage.max(stage);
            stages.insert(op, stage);
        }
        Self {
            stages,
            op_order,
            max_stage,
        }
    }

    pub fn stage_of(&self, op: &R::Op) -> Option<usize> {
        self.stages.get(op).copied()
    }

    pub fn op_order(&self) -> &[R::Op] {
        &self.op_order
    }

    pub fn is_empty(&self) -> bool {
        self.op_order.is_empty()
    }

    /// `S`, the highest stage index (number of pipeline stages minus one).
    pub fn max_stage(&self) -> usize {
        self.max_stage
    }

    /// Ops scheduled in `opOrder` at stage `<= upto` (used by prologue
    /// emission) or `>= from` (used by epilogue emission).
    pub fn ops_at_most(&self, upto: usize) -> Vec<R::Op> {
        self.op_order
            .iter()
            .filter(|op| self.stages.get(*op).copied().unwrap_or(usize::MAX) <= upto)
            .cloned()
            .collect()
    }

    pub fn ops_at_least(&self, from: usize) -> Vec<R::Op> {
        self.op_order
            .iter()
            .filter(|op| self.stages.get(*op).copied().unwrap_or(0) >= from)
            .cloned()
            .collect()
    }
}
