//! Phase 4.5: epilogue emission (peeled mode only).

#[cfg(feature = "trace")]
use tracing::debug;

use crate::features::pipelining::domain::{LoopView, Part, PipeliningOptions, Schedule, VersionMap};
use crate::features::pipelining::ports::Rewriter;

use super::kernel::KernelResult;
use super::support::substitution_map;

/// Emits the `S` drain iterations and returns the original loop's result
/// values, one per original iter-arg position.
///
/// Positions whose yield-feeding op is at stage 0 are never touched by the
/// drain loop below (it only ever runs ops at stage `>= 1`); those are
/// pre-seeded from the kernel's own result, since the kernel's final real
/// iteration already covers stage 0 of the last trip.
pub fn emit_epilogue<R: Rewriter>(
    rewriter: &mut R,
    loop_view: &LoopView<R>,
    schedule: &Schedule<R>,
    version_map: &mut VersionMap<R>,
    kernel: &KernelResult<R>,
    options: &mut PipeliningOptions<R>,
) -> Vec<R::Value> {
    let s_max = schedule.max_stage();
    let mut return_values: Vec<Option<R::Value>> = kernel
        .new_loop_results
        .iter()
        .take(loop_view.iter_args.len())
        .cloned()
        .map(Some)
        .collect();

    #[cfg(feature = "trace")]
    debug!(iterations = s_max, "emitting epilogue");

    for j in 0..s_max {
        let iv_val = rewriter.materialize_index_const(
            loop_view.lb + loop_view.step * (loop_view.trip_count - 1 - j as i64),
        );
        version_map.set(&loop_view.iv, s_max - j, iv_val);
    }

    for i in 1..=s_max {
        for op in schedule.ops_at_least(i) {
            let s = schedule.stage_of(&op).expect("scheduled op");
            let age = s_max - s + i;
            let operand_map = substitution_map(rewriter, &op, age, version_map);
            let clone = rewriter.clone_op(&op, &operand_map);

            let orig_results = rewriter.op_results(&op);
            let clone_results = rewriter.op_results(&clone);
            for (orig, new) in orig_results.iter().zip(clone_results.iter()) {
                version_map.set(orig, age, new.clone());
                if let Some(p) = loop_view.yield_operands.iter().position(|y| y == orig) {
                    let version = age + 1;
                    if version > s_max {
                        return_values[p] = Some(new.clone());
                    } else {
                        version_map.set(&loop_view.iter_args[p], version, new.clone());
                    }
                }
            }

            if let Some(annotate) = options.annotate_fn.as_mut() {
                annotate(rewriter, clone, Part::Epilogue, i - 1);
            }
        }
    }

    return_values
        .into_iter()
        .map(|v| v.expect("every loop result is produced by the kernel or the epilogue"))
        .collect()
}
