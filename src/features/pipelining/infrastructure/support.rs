//! Shared helpers used by more than one phase.

use ahash::AHashMap;

use crate::features::pipelining::ports::Rewriter;

/// Every value `op` reads, whether directly as an operand or indirectly as
/// an operand of an op nested in one of `op`'s regions. Used to build the
/// substitution map handed to [`Rewriter::clone_op`], which is documented to
/// remap nested-region operands as well as direct ones.
pub(super) fn candidate_operands<R: Rewriter>(rewriter: &R, op: &R::Op) -> Vec<R::Value> {
    let mut values = rewriter.op_operands(op);
    for (_, _, value) in rewriter.escaping_operands(op) {
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// Builds the operand substitution map for cloning `op` (scheduled at stage
/// `s`) in a peeled copy `i`: every candidate operand with a populated
/// version-map slot at age `i - s` is substituted; operands without one are
/// left for `clone_op` to pass through unchanged (loop-invariant values).
pub(super) fn substitution_map<R: Rewriter>(
    rewriter: &R,
    op: &R::Op,
    age: usize,
    version_map: &crate::features::pipelining::domain::VersionMap<R>,
) -> AHashMap<R::Value, R::Value> {
    let mut map = AHashMap::new();
    for value in candidate_operands(rewriter, op) {
        if let Some(replacement) = version_map.get(&value, age) {
            map.insert(value, replacement.clone());
        }
    }
    map
}
