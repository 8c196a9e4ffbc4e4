//! Phase 4.2: prologue emission.

#[cfg(feature = "trace")]
use tracing::debug;

use crate::features::pipelining::domain::{LoopView, Part, PipeliningOptions, Schedule, VersionMap};
use crate::features::pipelining::ports::Rewriter;

use super::support::substitution_map;

/// Emits the `S` peeled warm-up iterations and returns the populated
/// value-version map `V` the remaining phases build on.
pub fn emit_prologue<R: Rewriter>(
    rewriter: &mut R,
    loop_view: &LoopView<R>,
    schedule: &Schedule<R>,
    options: &mut PipeliningOptions<R>,
) -> VersionMap<R> {
    let s_max = schedule.max_stage();
    let mut version_map = VersionMap::new(s_max + 1);

    for (j, iter_arg) in loop_view.iter_args.iter().enumerate() {
        version_map.set(iter_arg, 0, loop_view.init_operands[j].clone());
    }

    #[cfg(feature = "trace")]
    debug!(iterations = s_max, "emitting prologue");

    for i in 0..s_max {
        let iv_i = rewriter.materialize_index_const(loop_view.lb + (i as i64) * loop_view.step);
        version_map.set(&loop_view.iv, i, iv_i);

        for op in schedule.ops_at_most(i) {
            let stage = schedule.stage_of(&op).expect("scheduled op");
            if stage > i {
                continue;
            }
            let age = i - stage;
            let operand_map = substitution_map(rewriter, &op, age, &version_map);
            let clone = rewriter.clone_op(&op, &operand_map);

            let orig_results = rewriter.op_results(&op);
            let clone_results = rewriter.op_results(&clone);
            for (orig, new) in orig_results.iter().zip(clone_results.iter()) {
                version_map.set(orig, age, new.clone());
                if let Some(p) = loop_view
                    .yield_operands
                    .iter()
                    .position(|y| y == orig)
                {
                    version_map.set(&loop_view.iter_args[p], age + 1, new.clone());
                }
            }

            if let Some(annotate) = options.annotate_fn.as_mut() {
                annotate(rewriter, clone, Part::Prologue, i);
            }
        }
    }

    version_map
}
