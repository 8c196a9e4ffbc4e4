//! The loop descriptor (§3 "Loop descriptor").

use crate::features::pipelining::ports::Rewriter;

/// A snapshot of the structured counted loop being pipelined, plus the
/// constants extracted from its bound-defining ops during validation.
#[derive(Clone)]
pub struct LoopView<R: Rewriter> {
    pub loop_op: R::Op,
    pub body_block: R::Block,
    pub iv: R::Value,
    /// Region arguments of the body after `iv` (`a1 .. ak`).
    pub iter_args: Vec<R::Value>,
    /// Operands of the body's `yield`, one per iter-arg, in order.
    pub yield_operands: Vec<R::Value>,
    /// Initial operands fed to the loop for each iter-arg.
    pub init_operands: Vec<R::Value>,
    /// The loop's own result values (one per iter-arg), as seen by users
    /// outside the loop.
    pub original_results: Vec<R::Value>,
    /// Non-terminator ops in the body, in their original textual order.
    pub body_ops: Vec<R::Op>,
    pub lb: i64,
    pub ub: i64,
    pub step: i64,
    pub trip_count: i64,
}

impl<R: Rewriter> LoopView<R> {
    /// Position of `yield` operand `p` that corresponds to a given iter-arg,
    /// or `None` if `value` is not a body iter-arg.
    pub fn iter_arg_index(&self, value: &R::Value) -> Option<usize> {
        self.iter_args.iter().position(|a| a == value)
    }
}
