//! Phase 4.6: the driver. Mirrors `BuildSSAUseCase::execute` - a thin
//! use-case layer that sequences the infrastructure phases and translates
//! their results into the public [`PipelineOutcome`].

#[cfg(feature = "trace")]
use tracing::info;

use crate::errors::PipelineOutcome;
use crate::features::pipelining::domain::PipeliningOptions;
use crate::features::pipelining::infrastructure::{
    analyze_cross_stage, build_kernel, emit_epilogue, emit_prologue, validate,
};
use crate::features::pipelining::ports::Rewriter;

/// Rewrites `loop_op` into a prologue/kernel/epilogue (or predicated
/// trailing-tail kernel) per the stage assignment `options.get_schedule`
/// returns. See §6 for the full contract.
pub fn pipeline_loop<R: Rewriter>(
    rewriter: &mut R,
    loop_op: R::Op,
    options: &mut PipeliningOptions<R>,
) -> PipelineOutcome<R::Op> {
    let (loop_view, schedule) = match validate(rewriter, &loop_op, options) {
        Ok(validated) => validated,
        Err(outcome) => return outcome,
    };

    let mut version_map = emit_prologue(rewriter, &loop_view, &schedule, options);
    let cross_stage = analyze_cross_stage(rewriter, &loop_view, &schedule);

    let kernel = match build_kernel(
        rewriter,
        &loop_view,
        &schedule,
        &cross_stage,
        &mut version_map,
        options,
    ) {
        Ok(kernel) => kernel,
        Err(err) => return PipelineOutcome::Failed(err),
    };

    let final_results = if options.peel_epilogue {
        emit_epilogue(
            rewriter,
            &loop_view,
            &schedule,
            &mut version_map,
            &kernel,
            options,
        )
    } else {
        kernel
            .new_loop_results
            .iter()
            .take(loop_view.iter_args.len())
            .cloned()
            .collect()
    };

    for (old, new) in loop_view
        .original_results
        .into_iter()
        .zip(final_results.into_iter())
    {
        rewriter.replace_all_uses(old, new);
    }
    rewriter.erase_op(&loop_view.loop_op);

    #[cfg(feature = "trace")]
    info!(
        max_stage = schedule.max_stage(),
        trip_count = loop_view.trip_count,
        peeled = options.peel_epilogue,
        "pipelined loop"
    );

    PipelineOutcome::Pipelined(kernel.new_loop)
}
