//! Phase 4.1: validation and setup.

use ahash::{AHashMap, AHashSet};

#[cfg(feature = "trace")]
use tracing::debug;

use crate::errors::{NotApplicableReason, PipelineError, PipelineOutcome};
use crate::features::pipelining::domain::{LoopView, PipeliningOptions, Schedule};
use crate::features::pipelining::ports::Rewriter;

/// Runs every check in §4.1. On success returns the loop view and schedule
/// the remaining phases operate on. On failure returns the outcome the
/// driver should hand back to the caller directly - no IR has been mutated
/// by this phase in either case.
pub fn validate<R: Rewriter>(
    rewriter: &mut R,
    loop_op: &R::Op,
    options: &PipeliningOptions<R>,
) -> Result<(LoopView<R>, Schedule<R>), PipelineOutcome<R::Op>> {
    let structure = rewriter.loop_structure(loop_op);

    let (Some(lb), Some(ub), Some(step)) = (structure.lb, structure.ub, structure.step) else {
        #[cfg(feature = "trace")]
        debug!("pipeline_loop: declining, non-constant bounds");
        return Err(PipelineOutcome::NotApplicable(
            NotApplicableReason::NonConstantBounds,
        ));
    };
    if step == 0 {
        return Err(PipelineOutcome::Failed(PipelineError::InvalidSchedule {
            reason: "loop step is zero".to_string(),
        }));
    }

    let assignments = (options.get_schedule)(rewriter, loop_op);
    if assignments.is_empty() {
        #[cfg(feature = "trace")]
        debug!("pipeline_loop: declining, schedule oracle returned nothing");
        return Err(PipelineOutcome::NotApplicable(
            NotApplicableReason::EmptySchedule,
        ));
    }
    let schedule = Schedule::new(assignments);

    let trip_count = if step > 0 {
        (ub - lb + step - 1) / step
    } else {
        (lb - ub - step - 1) / (-step)
    };
    if trip_count <= schedule.max_stage() as i64 {
        #[cfg(feature = "trace")]
        debug!(
            trip_count,
            max_stage = schedule.max_stage(),
            "pipeline_loop: declining, trip count too small"
        );
        return Err(PipelineOutcome::NotApplicable(
            NotApplicableReason::TripCountTooSmall {
                trip_count,
                max_stage: schedule.max_stage(),
            },
        ));
    }

    for op in &structure.body_ops {
        if schedule.stage_of(op).is_none() {
            rewriter.emit_diagnostic(op, "body op has no assigned pipeline stage");
            return Err(PipelineOutcome::Failed(PipelineError::InvalidSchedule {
                reason: format!("body op {op:?} has no assigned stage"),
            }));
        }
    }
    // §4.1 step 6 is two independent checks: the terminator itself must
    // never be staged, and every staged op's parent must be the body block.
    // `structure.body_ops` already excludes the terminator by construction
    // (it is documented as "non-terminator ops in the body"), so a schedule
    // entry missing from that set - including a malformed oracle staging the
    // `yield` - is caught here before it ever reaches `clone_op`.
    let body_op_set: AHashSet<R::Op> = structure.body_ops.iter().cloned().collect();
    for op in schedule.op_order() {
        if !body_op_set.contains(op) {
            rewriter.emit_diagnostic(op, "staged op is the terminator or not a body op");
            return Err(PipelineOutcome::Failed(PipelineError::InvalidSchedule {
                reason: format!("staged op {op:?} is the loop terminator or otherwise not a body op"),
            }));
        }
        if rewriter.op_parent_block(op) != structure.body_block {
            rewriter.emit_diagnostic(op, "staged op does not belong to the loop body block");
            return Err(PipelineOutcome::Failed(PipelineError::InvalidSchedule {
                reason: format!("staged op {op:?} is not a member of the loop body block"),
            }));
        }
    }

    let defined_by: AHashMap<R::Value, R::Op> = structure
        .body_ops
        .iter()
        .flat_map(|op| {
            rewriter
                .op_results(op)
                .into_iter()
                .map(move |v| (v, op.clone()))
        })
        .collect();
    // Every yield operand must be produced by a staged body op - a bare
    // passthrough of `iv` or of an iter-arg's own block argument has no
    // defining stage for cross_stage_analysis/kernel construction to key off.
    for operand in &structure.yield_operands {
        if !defined_by.contains_key(operand) {
            return Err(PipelineOutcome::NotApplicable(
                NotApplicableReason::LoopCarryDistanceTooLarge,
            ));
        }
    }

    if !options.peel_epilogue && options.predicate_fn.is_none() {
        return Err(PipelineOutcome::NotApplicable(
            NotApplicableReason::MissingPredicateAndNoPeel,
        ));
    }

    let loop_view = LoopView {
        loop_op: loop_op.clone(),
        body_block: structure.body_block,
        iv: structure.iv,
        iter_args: structure.iter_args,
        yield_operands: structure.yield_operands,
        init_operands: structure.init_operands,
        original_results: structure.results,
        body_ops: structure.body_ops,
        lb,
        ub,
        step,
        trip_count,
    };
    Ok((loop_view, schedule))
}
