//! Phase 4.3: cross-stage analysis.

use ahash::AHashMap;

use crate::features::pipelining::domain::{CrossStageTable, LoopView, Schedule};
use crate::features::pipelining::ports::Rewriter;

use super::support::candidate_operands;

/// Walks every staged op's operands (including nested-region operands) and
/// records, in `X`, every value whose live range crosses from a lower stage
/// to a strictly higher one.
pub fn analyze_cross_stage<R: Rewriter>(
    rewriter: &R,
    loop_view: &LoopView<R>,
    schedule: &Schedule<R>,
) -> CrossStageTable<R> {
    let defined_by: AHashMap<R::Value, R::Op> = loop_view
        .body_ops
        .iter()
        .flat_map(|op| {
            rewriter
                .op_results(op)
                .into_iter()
                .map(move |v| (v, op.clone()))
        })
        .collect();

    let mut table = CrossStageTable::new();

    for op in schedule.op_order() {
        let u = schedule.stage_of(op).expect("scheduled op");
        for operand in candidate_operands(rewriter, op) {
            if operand == loop_view.iv {
                continue;
            }

            // An operand that is a body iter-arg is an alias, one iteration
            // old, for the value its yield operand resolves to; we key the
            // table on that underlying value (not the block-argument
            // handle) so it matches the lookup kernel construction performs
            // after following the same alias (see `kernel::decide_override`).
            let resolved = if let Some(j) = loop_view.iter_arg_index(&operand) {
                let yielded = loop_view.yield_operands[j].clone();
                defined_by
                    .get(&yielded)
                    .map(|def| (yielded, def.clone(), 1usize))
            } else {
                defined_by
                    .get(&operand)
                    .map(|def| (operand.clone(), def.clone(), 0usize))
            };

            let Some((key, def, distance)) = resolved else {
                continue; // not body-local: loop-invariant, skip
            };

            let d = schedule.stage_of(&def).expect("scheduled op");
            if d == u || d + distance == u {
                continue; // same-stage or exactly-compensated loop carry
            }
            debug_assert!(u > d, "cross-stage use must be strictly later than its def");
            table.record_use(key, d, u);
        }
    }

    table
}
