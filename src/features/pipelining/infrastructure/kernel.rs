//! Phase 4.4: kernel-loop construction.

use ahash::AHashMap;

#[cfg(feature = "trace")]
use tracing::debug;

use crate::errors::{PipelineError, Result};
use crate::features::pipelining::domain::{
    CrossStageTable, LoopArgMap, LoopView, Part, PipeliningOptions, Schedule, VersionMap,
};
use crate::features::pipelining::ports::Rewriter;

/// Everything [`build_kernel`] hands back to the driver: the new loop op and
/// its own results (aligned 1:1 with the extended iter-arg list), needed by
/// the driver directly in trailing-tail mode and by the epilogue phase in
/// peeled mode.
pub struct KernelResult<R: Rewriter> {
    pub new_loop: R::Op,
    pub new_loop_results: Vec<R::Value>,
}

/// Builds the extended-iter-arg kernel loop (§4.4) and threads the cloned
/// body through it. Mutates `version_map` with the slots the epilogue phase
/// (and, for non-peeled callers, nothing else) relies on afterward.
pub fn build_kernel<R: Rewriter>(
    rewriter: &mut R,
    loop_view: &LoopView<R>,
    schedule: &Schedule<R>,
    cross_stage: &CrossStageTable<R>,
    version_map: &mut VersionMap<R>,
    options: &mut PipeliningOptions<R>,
) -> Result<KernelResult<R>> {
    let s_max = schedule.max_stage();

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
    let stage_of_def = |v: &R::Value| -> usize {
        schedule
            .stage_of(defined_by.get(v).expect("body-local value"))
            .expect("scheduled op")
    };

    // ---- extend iter-args -----------------------------------------------
    let mut new_init_args: Vec<R::Value> = Vec::new();
    let mut loop_arg_map: LoopArgMap<R> = LoopArgMap::new();

    for (p, iter_arg) in loop_view.iter_args.iter().enumerate() {
        let dp = stage_of_def(&loop_view.yield_operands[p]);
        new_init_args.push(version_map.require(iter_arg, s_max - dp).clone());
    }
    for (v, entry) in cross_stage.iter() {
        let (d, u) = (entry.def_stage, entry.last_use_stage);
        for stage_idx in 0..(u - d) {
            let init = version_map.require(v, s_max - u + stage_idx).clone();
            new_init_args.push(init);
            let position = new_init_args.len() - 1;
            loop_arg_map.insert(v.clone(), u - d - stage_idx, position);
        }
    }

    #[cfg(feature = "trace")]
    debug!(
        new_iter_args = new_init_args.len(),
        "building kernel loop"
    );

    // ---- create the new loop ---------------------------------------------
    let peeled = options.peel_epilogue;
    let new_ub = if peeled {
        loop_view.ub - (s_max as i64) * loop_view.step
    } else {
        loop_view.ub
    };
    let (new_loop, new_body, iv_prime, iter_args_prime) =
        rewriter.build_counted_loop(loop_view.lb, new_ub, loop_view.step, new_init_args);

    // ---- predicate precomputation (trailing-tail mode only) --------------
    let mut predicates: Vec<Option<R::Value>> = Vec::with_capacity(s_max);
    if !peeled {
        for i in 0..s_max {
            let threshold = loop_view.ub - ((s_max - i) as i64) * loop_view.step;
            let threshold_val = rewriter.materialize_index_const(threshold);
            predicates.push(Some(
                rewriter.materialize_compare_lt(iv_prime.clone(), threshold_val),
            ));
        }
    }
    let pred_for_stage = |s: usize| -> Option<&R::Value> {
        if peeled || s >= s_max {
            None
        } else {
            predicates[s].as_ref()
        }
    };

    // ---- clone the body in opOrder -----------------------------------------
    let mut m: AHashMap<R::Value, R::Value> = AHashMap::new();
    m.insert(loop_view.iv.clone(), iv_prime.clone());
    for (a, a_prime) in loop_view.iter_args.iter().zip(iter_args_prime.iter()) {
        m.insert(a.clone(), a_prime.clone());
    }

    for op in schedule.op_order() {
        let s = schedule.stage_of(op).expect("scheduled op");
        let operand_map = build_operand_map(
            rewriter,
            loop_view,
            schedule,
            &loop_arg_map,
            &m,
            &defined_by,
            op,
            s,
            s_max,
            &iv_prime,
            &iter_args_prime,
        );
        let mut clone = rewriter.clone_op(op, &operand_map);

        if let Some(pred) = pred_for_stage(s).cloned() {
            match (options.predicate_fn.as_mut(), pred) {
                (Some(predicate_fn), pred_value) => {
                    match predicate_fn(rewriter, clone.clone(), pred_value) {
                        Some(predicated) => clone = predicated,
                        None => {
                            return Err(PipelineError::PredicationRefused {
                                op_debug: format!("{op:?}"),
                            })
                        }
                    }
                }
                (None, _) => {
                    return Err(PipelineError::Internal {
                        message: "trailing-tail mode requires a predicate_fn".to_string(),
                    })
                }
            }
        }

        for (orig, new) in rewriter
            .op_results(op)
            .iter()
            .zip(rewriter.op_results(&clone).iter())
        {
            m.insert(orig.clone(), new.clone());
        }

        if let Some(annotate) = options.annotate_fn.as_mut() {
            annotate(rewriter, clone, Part::Kernel, 0);
        }
    }

    // ---- build the new yield ----------------------------------------------
    let mut yield_values: Vec<Option<R::Value>> = vec![None; iter_args_prime.len()];

    for (p, y) in loop_view.yield_operands.iter().enumerate() {
        let base = m.get(y).expect("kernel body clones every yielded value").clone();
        let value = if !peeled {
            let dy = stage_of_def(y);
            match pred_for_stage(dy) {
                Some(pred) => {
                    rewriter.materialize_select(pred.clone(), base, iter_args_prime[p].clone())
                }
                None => base,
            }
        } else {
            base
        };
        yield_values[p] = Some(value);
    }

    for (v, entry) in cross_stage.iter() {
        let (d, u) = (entry.def_stage, entry.last_use_stage);
        for k in 1..=(u - d) {
            let pos = loop_arg_map.require(v, k);
            let value = if k == 1 {
                m.get(v).expect("cross-stage value computed this iteration").clone()
            } else {
                iter_args_prime[loop_arg_map.require(v, k - 1)].clone()
            };
            yield_values[pos] = Some(value);
        }
    }

    rewriter.set_yield(
        &new_body,
        yield_values
            .into_iter()
            .map(|v| v.expect("every kernel iter-arg slot must be yielded"))
            .collect(),
    );

    let new_loop_results = rewriter.loop_results(&new_loop);

    // ---- seed version_map for the epilogue phase ---------------------------
    for (v, entry) in cross_stage.iter() {
        let (d, u) = (entry.def_stage, entry.last_use_stage);
        let mut version = s_max - u + 1;
        for k in 1..=(u - d) {
            let pos = loop_arg_map.require(v, k);
            version_map.set(v, version, new_loop_results[pos].clone());
            version += 1;
        }
    }
    for (p, iter_arg) in loop_view.iter_args.iter().enumerate() {
        let dp = stage_of_def(&loop_view.yield_operands[p]);
        if dp > 0 {
            version_map.set(iter_arg, s_max - dp + 1, new_loop_results[p].clone());
        }
    }

    Ok(KernelResult {
        new_loop,
        new_loop_results,
    })
}

/// Decides, for one operand `w` of `op` (scheduled at stage `s`), the final
/// replacement value: the override rules from §4.4 when one applies, the
/// default `M`-based substitution otherwise. Takes `&mut R` because the
/// induction-variable override materializes a fresh `add` op.
#[allow(clippy::too_many_arguments)]
fn build_operand_map<R: Rewriter>(
    rewriter: &mut R,
    loop_view: &LoopView<R>,
    schedule: &Schedule<R>,
    loop_arg_map: &LoopArgMap<R>,
    m: &AHashMap<R::Value, R::Value>,
    defined_by: &AHashMap<R::Value, R::Op>,
    op: &R::Op,
    s: usize,
    s_max: usize,
    iv_prime: &R::Value,
    iter_args_prime: &[R::Value],
) -> AHashMap<R::Value, R::Value> {
    let mut operand_map = AHashMap::new();
    let mut candidates = rewriter.op_operands(op);
    for (_, _, value) in rewriter.escaping_operands(op) {
        if !candidates.contains(&value) {
            candidates.push(value);
        }
    }

    for w in candidates {
        let default = m.get(&w).cloned();

        let override_value = if w == loop_view.iv {
            let offset = ((s_max - s) as i64) * loop_view.step;
            let offset_val = rewriter.materialize_index_const(offset);
            Some(rewriter.materialize_index_add(iv_prime.clone(), offset_val))
        } else if let Some(j) = loop_view.iter_arg_index(&w) {
            let ret = loop_view.yield_operands[j].clone();
            let stage_ret = schedule
                .stage_of(defined_by.get(&ret).expect("body-local value"))
                .expect("scheduled op");
            if stage_ret == s {
                None
            } else if stage_ret == s + 1 {
                m.get(&ret).cloned()
            } else {
                loop_arg_map
                    .get(&ret, s - stage_ret)
                    .map(|pos| iter_args_prime[pos].clone())
            }
        } else if let Some(def) = defined_by.get(&w) {
            let sd = schedule.stage_of(def).expect("scheduled op");
            if sd == s {
                None
            } else {
                loop_arg_map
                    .get(&w, s - sd)
                    .map(|pos| iter_args_prime[pos].clone())
            }
        } else {
            None
        };

        if let Some(v) = override_value.or(default) {
            operand_map.insert(w, v);
        }
    }

    operand_map
}
