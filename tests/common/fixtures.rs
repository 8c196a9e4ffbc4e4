//! Loop fixtures covering the core end-to-end scenarios: a single-stage
//! (trivial) loop, an N-stage "load, compute chain, store" loop, and a loop
//! that also carries a cross-iteration accumulator so the trailing-tail
//! `select`-for-escaping-values path gets exercised.

#![allow(dead_code)]

use super::toy_ir::{BlockId, Module, OpId, OpKind};

pub struct Fixture {
    pub module: Module,
    pub entry: BlockId,
    pub loop_op: OpId,
    pub schedule: Vec<(OpId, usize)>,
    pub max_stage: usize,
}

/// Deterministic input array: `a[i] = 7*i + 3`.
pub fn sample_array(n: usize) -> Vec<i64> {
    (0..n as i64).map(|i| 7 * i + 3).collect()
}

/// Scenario 1: `b = load a[i]; store r[i], b`, both ops at stage 0. No
/// pipelining transformation has any real work to do here - it's the
/// "zero cross-stage values" baseline.
pub fn build_single_stage_fixture(ub: i64) -> Fixture {
    let mut module = Module::new();
    let entry = module.new_block();
    let (loop_op, body, iv, _iter_args) = module.build_loop(entry, 0, ub, 1, vec![]);

    let (load_op, load_res) = module.push_op(body, OpKind::Load { array: "a" }, vec![iv], 1);
    let (store_op, _) = module.push_op(body, OpKind::Store { array: "r" }, vec![iv, load_res[0]], 0);
    module.set_yield(body, vec![]);

    let schedule = vec![(load_op, 0), (store_op, 0)];
    Fixture {
        module,
        entry,
        loop_op,
        schedule,
        max_stage: 0,
    }
}

/// An `s_max`-stage chain: `b0 = load a[i]; b1 = b0+1; ...; bS = b{S-1}+1;
/// store r[i], bS`, with `b0` at stage 0, `bk` at stage `k`, and `store` at
/// stage `s_max` alongside the final add (mirrors scenarios 2 and 4: stage 0
/// is a load, every later stage is one computation, the store rides along
/// with the last one). Requires `s_max >= 1`.
///
/// Every `bk` for `k = 0..s_max-1` is used one stage later than it's
/// defined, so `X` has exactly `s_max` entries of version count 1 each -
/// `r[i] = a[i] + s_max` regardless of how it's pipelined.
pub fn build_chain_fixture(s_max: usize, ub: i64) -> Fixture {
    assert!(s_max >= 1, "build_chain_fixture requires at least one stage boundary");
    let mut module = Module::new();
    let entry = module.new_block();
    let (_, one_res) = module.push_op(entry, OpKind::Const(1), vec![], 1);
    let one = one_res[0];

    let (loop_op, body, iv, _iter_args) = module.build_loop(entry, 0, ub, 1, vec![]);

    let mut schedule = Vec::new();
    let (load_op, load_res) = module.push_op(body, OpKind::Load { array: "a" }, vec![iv], 1);
    schedule.push((load_op, 0));
    let mut prev = load_res[0];

    for k in 1..s_max {
        let (add_op, add_res) = module.push_op(body, OpKind::Add, vec![prev, one], 1);
        schedule.push((add_op, k));
        prev = add_res[0];
    }

    let (final_add_op, final_add_res) = module.push_op(body, OpKind::Add, vec![prev, one], 1);
    schedule.push((final_add_op, s_max));
    let (store_op, _) = module.push_op(body, OpKind::Store { array: "r" }, vec![iv, final_add_res[0]], 0);
    schedule.push((store_op, s_max));

    module.set_yield(body, vec![]);

    Fixture {
        module,
        entry,
        loop_op,
        schedule,
        max_stage: s_max,
    }
}

/// `r[i] = a[i] + s_max` is the expected contents of the chain fixture's
/// output array after either the original or the pipelined loop runs.
pub fn expected_chain_output(ub: i64, s_max: usize, a_vals: &[i64]) -> Vec<i64> {
    (0..ub as usize).map(|i| a_vals[i] + s_max as i64).collect()
}

/// Like `build_chain_fixture`, but also threads a loop-carried accumulator
/// `acc' = acc + load(a,iv)` updated at stage 0 - strictly earlier than the
/// chain's `s_max` - and marks the final `acc` as used outside the loop.
/// Exercises the trailing-tail `select`-for-escaping-values path (the
/// accumulator's defining stage is `0 < s_max`, so the kernel's final
/// iterations must keep the previous iteration's running total instead of a
/// masked-off one). Requires `s_max >= 1`.
pub fn build_accumulator_fixture(s_max: usize, ub: i64, acc_init: i64) -> Fixture {
    assert!(s_max >= 1, "build_accumulator_fixture requires at least one stage boundary");
    let mut module = Module::new();
    let entry = module.new_block();
    let (_, one_res) = module.push_op(entry, OpKind::Const(1), vec![], 1);
    let one = one_res[0];
    let (_, init_res) = module.push_op(entry, OpKind::Const(acc_init), vec![], 1);
    let acc_init_val = init_res[0];

    let (loop_op, body, iv, iter_args) = module.build_loop(entry, 0, ub, 1, vec![acc_init_val]);
    let acc = iter_args[0];

    let mut schedule = Vec::new();
    let (load_op, load_res) = module.push_op(body, OpKind::Load { array: "a" }, vec![iv], 1);
    schedule.push((load_op, 0));
    let b0 = load_res[0];

    let (accp_op, accp_res) = module.push_op(body, OpKind::Add, vec![acc, b0], 1);
    schedule.push((accp_op, 0));
    let acc_next = accp_res[0];

    let mut prev = b0;
    for k in 1..s_max {
        let (add_op, add_res) = module.push_op(body, OpKind::Add, vec![prev, one], 1);
        schedule.push((add_op, k));
        prev = add_res[0];
    }

    let (final_add_op, final_add_res) = module.push_op(body, OpKind::Add, vec![prev, one], 1);
    schedule.push((final_add_op, s_max));
    let (store_op, _) = module.push_op(body, OpKind::Store { array: "r" }, vec![iv, final_add_res[0]], 0);
    schedule.push((store_op, s_max));

    module.set_yield(body, vec![acc_next]);
    let acc_result = module.loops[&loop_op].results[0];
    module.external_outputs.push(acc_result);

    Fixture {
        module,
        entry,
        loop_op,
        schedule,
        max_stage: s_max,
    }
}

/// `acc_init + sum(a[0..ub])`, independent of how many pipeline stages the
/// store-chain alongside it has.
pub fn expected_accumulator_total(acc_init: i64, ub: i64, a_vals: &[i64]) -> i64 {
    acc_init + a_vals[..ub as usize].iter().sum::<i64>()
}
